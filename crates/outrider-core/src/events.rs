//! Events exchanged over the [`EventBus`](crate::bus::EventBus).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{DestroyCause, EnemyArchetype};
use crate::types::EntityRef;

/// Discriminant of a [`GameEvent`]; subscriptions are keyed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    LevelStart,
    LevelEnd,
    EnvironmentSpeedChanged,
    TankSpeedChanged,
    WeaponChanged,
    WeaponAmmoChanged,
    PlayerHit,
    EnemyDestroyed,
    AllWavesCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::LevelStart,
        EventKind::LevelEnd,
        EventKind::EnvironmentSpeedChanged,
        EventKind::TankSpeedChanged,
        EventKind::WeaponChanged,
        EventKind::WeaponAmmoChanged,
        EventKind::PlayerHit,
        EventKind::EnemyDestroyed,
        EventKind::AllWavesCompleted,
    ];

    /// Sticky kinds cache their last value and replay it to new subscribers.
    pub fn is_sticky(self) -> bool {
        matches!(
            self,
            EventKind::EnvironmentSpeedChanged | EventKind::TankSpeedChanged
        )
    }
}

/// An immutable game event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    LevelStart,
    LevelEnd,
    /// Scroll speed of the environment. Zero means paused.
    EnvironmentSpeedChanged { speed: f32 },
    /// Player vehicle speed.
    TankSpeedChanged { speed: f32 },
    WeaponChanged { weapon_id: String },
    WeaponAmmoChanged {
        weapon_id: String,
        ammo: u32,
        infinite: bool,
    },
    /// A projectile struck the player.
    PlayerHit { damage: i32, hit_point: Vec3 },
    /// An enemy left the simulation. Published exactly once per enemy.
    EnemyDestroyed {
        enemy: EntityRef,
        archetype: EnemyArchetype,
        cause: DestroyCause,
    },
    /// Every wave has been spawned and cleared.
    AllWavesCompleted,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::LevelStart => EventKind::LevelStart,
            GameEvent::LevelEnd => EventKind::LevelEnd,
            GameEvent::EnvironmentSpeedChanged { .. } => EventKind::EnvironmentSpeedChanged,
            GameEvent::TankSpeedChanged { .. } => EventKind::TankSpeedChanged,
            GameEvent::WeaponChanged { .. } => EventKind::WeaponChanged,
            GameEvent::WeaponAmmoChanged { .. } => EventKind::WeaponAmmoChanged,
            GameEvent::PlayerHit { .. } => EventKind::PlayerHit,
            GameEvent::EnemyDestroyed { .. } => EventKind::EnemyDestroyed,
            GameEvent::AllWavesCompleted => EventKind::AllWavesCompleted,
        }
    }

    pub fn is_sticky(&self) -> bool {
        self.kind().is_sticky()
    }
}
