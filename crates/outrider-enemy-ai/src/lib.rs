//! Enemy behaviour for OUTRIDER.
//!
//! Per-archetype state machines (Drone, Jet, Tank, MiniBoss) composed from
//! shared pieces: screen lifecycle gating, damage bookkeeping, fire timers,
//! and the avoidance and ballistic solvers. No ECS dependency: everything
//! operates on plain data plus a [`TickContext`].

pub mod archetypes;
pub mod avoidance;
pub mod ballistic;
pub mod body;
pub mod context;
pub mod enemy;
pub mod lifecycle;
pub mod motion;
pub mod random;
pub mod timers;

pub use outrider_core as core;

pub use context::{EnemyCommand, ProjectileSpec, SpawnContext, TickContext};
pub use enemy::Enemy;
