//! Snapshot system: queries the ECS world and builds a complete `SimSnapshot`.
//!
//! This system is read-only. It never modifies the world.

use glam::Vec3;
use hecs::World;

use outrider_core::enums::LevelPhase;
use outrider_core::events::GameEvent;
use outrider_core::services::EffectRequest;
use outrider_core::state::{EnemyView, ProjectileView, SessionStats, SimSnapshot, WaveView};
use outrider_core::types::SimTime;
use outrider_enemy_ai::Enemy;

use crate::components::{entity_ref, Player};
use crate::systems::projectiles;

/// Per-tick values that do not live in the world.
pub struct SnapshotInputs {
    pub time: SimTime,
    pub level: LevelPhase,
    pub scenario: Option<String>,
    pub waves: WaveView,
    pub environment_speed: f32,
    pub effects: Vec<EffectRequest>,
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
}

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(world: &World, inputs: SnapshotInputs) -> SimSnapshot {
    SimSnapshot {
        time: inputs.time,
        level: inputs.level,
        scenario: inputs.scenario,
        waves: inputs.waves,
        player: find_player(world),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        environment_speed: inputs.environment_speed,
        effects: inputs.effects,
        events: inputs.events,
        stats: inputs.stats,
    }
}

fn find_player(world: &World) -> Option<Vec3> {
    world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(_, player)| player.position())
}

/// Enemies ordered by id so snapshots compare stably.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| !enemy.should_remove())
        .map(|(_, enemy)| enemy.view())
        .collect();
    enemies.sort_by_key(|view| view.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = projectiles::live(world)
        .into_iter()
        .map(|(entity, p)| ProjectileView {
            id: entity_ref(entity),
            kind: p.kind,
            position: p.position,
            velocity: p.velocity,
        })
        .collect();
    views.sort_by_key(|view| view.id);
    views
}
