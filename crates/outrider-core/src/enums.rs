//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Requested spawn side for a spawn batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSide {
    Left,
    Right,
    /// Coin flip per spawned entity.
    #[default]
    Random,
}

impl SpawnSide {
    /// Resolve to a concrete side. `coin` is a uniform draw in [0, 1).
    pub fn resolve(self, coin: f32) -> Side {
        match self {
            SpawnSide::Left => Side::Left,
            SpawnSide::Right => Side::Right,
            SpawnSide::Random => {
                if coin < 0.5 {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }
}

/// Resolved screen side an entity entered from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// Travel direction along world X: entities from the left move right.
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// Sign of the side relative to the screen center (left = -1).
    pub fn outward(self) -> f32 {
        -self.direction()
    }
}

/// How a spawn position is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnMode {
    /// Just outside the horizontal viewport edge on the resolved side.
    #[default]
    Offscreen,
    /// A configured world position.
    FixedWorld,
}

/// Enemy archetype. Selects the behaviour state machine at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Hovering gun drone.
    Drone,
    /// Dive-bombing jet.
    Jet,
    /// Ground tank with ballistic cannon.
    Tank,
    /// Stationary turret boss that halts scrolling.
    MiniBoss,
}

/// Coarse lifecycle of an enemy instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecyclePhase {
    #[default]
    NotEntered,
    OnScreen,
    /// Terminal: dying, crashing or awaiting removal.
    Destroying,
}

/// Why an enemy left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Hit points reached zero.
    Killed,
    /// Left the screen after having entered it.
    Despawned,
}

/// Collision layer used by spatial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Enemy,
    Environment,
    Player,
}

/// Enemy projectile family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight, fast, locked direction.
    Bullet,
    /// Slow straight drop aimed at the player.
    Bomb,
    /// Gravity-affected lobbed shell.
    Shell,
}

/// Level phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// Visual or audio effect requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    MuzzleFlash,
    SmokeFire,
    Explosion,
    BigExplosion,
    Impact,
    /// Damage smoke once an enemy falls to half health.
    DamagedHalf,
    /// Heavier damage effect at a quarter health.
    DamagedQuarter,
}

/// Progress of the wave orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    #[default]
    Idle,
    /// Waiting out a wave's start delay.
    Delay,
    /// Spawn batches still emitting.
    Spawning,
    /// Everything spawned; waiting for the wave to be cleared.
    AwaitClear,
    Completed,
    Stopped,
}
