//! Simulation snapshot: the complete observable state after a tick.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::services::EffectRequest;
use crate::types::{EntityRef, SimTime};

/// State broadcast to the host after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub level: LevelPhase,
    pub scenario: Option<String>,
    pub waves: WaveView,
    pub player: Option<Vec3>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Last published environment scroll speed (0 = paused).
    pub environment_speed: f32,
    /// Effects requested during this tick, in request order.
    pub effects: Vec<EffectRequest>,
    /// Events published during this tick, in publish order.
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub phase: WavePhase,
    /// Index of the wave being delayed, spawned or cleared.
    pub current_wave: Option<usize>,
    pub total_waves: usize,
    pub alive: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityRef,
    pub archetype: EnemyArchetype,
    pub position: Vec3,
    pub rotation: Quat,
    pub side: Side,
    pub lifecycle: LifecyclePhase,
    /// Name of the behaviour state, e.g. "FiringLoop".
    pub state: String,
    pub hp: i32,
    pub max_hp: i32,
    /// Aim angle of the gun/cannon/turret in degrees, if it has one.
    pub aim_degrees: Option<f32>,
    /// Cosmetic offset of the visual root (fire shake).
    pub visual_offset: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityRef,
    pub kind: ProjectileKind,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Session counters, accumulated from bus events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub enemies_despawned: u32,
    pub player_hits: u32,
    pub player_damage: i32,
    pub waves_completed: u32,
}
