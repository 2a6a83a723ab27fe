//! Per-tick inputs handed to enemy behaviours, and the commands they emit.

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use outrider_core::enums::{ProjectileKind, Side};
use outrider_core::events::{EventKind, GameEvent};
use outrider_core::services::{CameraProjection, EffectRequest, SpatialQuery};
use outrider_core::tuning::Tuning;
use outrider_core::types::EntityRef;
use outrider_core::EventBus;

/// Placement resolved for a newly spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnContext {
    pub position: Vec3,
    pub side: Side,
}

/// A projectile an enemy wants launched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub origin: Vec3,
    pub velocity: Vec3,
    /// Downward acceleration; zero for straight shots.
    pub gravity: f32,
    pub shooter: EntityRef,
}

/// Side effects an enemy cannot apply itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyCommand {
    Fire(ProjectileSpec),
    Effect(EffectRequest),
}

/// Everything a behaviour may read or touch during one tick.
///
/// The player and camera are optional: their absence is a steady state and
/// behaviours fall back to plain forward motion.
pub struct TickContext<'a> {
    pub dt: f32,
    /// Elapsed simulation seconds.
    pub now: f32,
    pub player: Option<Vec3>,
    pub camera: Option<&'a dyn CameraProjection>,
    pub spatial: &'a dyn SpatialQuery,
    pub bus: &'a mut EventBus,
    pub rng: &'a mut ChaCha8Rng,
    pub tuning: &'a Tuning,
    pub commands: &'a mut Vec<EnemyCommand>,
}

impl TickContext<'_> {
    /// Last published environment scroll speed, if any.
    pub fn environment_speed(&self) -> Option<f32> {
        match self.bus.last_sticky(EventKind::EnvironmentSpeedChanged) {
            Some(GameEvent::EnvironmentSpeedChanged { speed }) => Some(*speed),
            _ => None,
        }
    }

    pub fn fire(&mut self, spec: ProjectileSpec) {
        self.commands.push(EnemyCommand::Fire(spec));
    }

    pub fn effect(&mut self, request: EffectRequest) {
        self.commands.push(EnemyCommand::Effect(request));
    }
}
