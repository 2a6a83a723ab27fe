//! Systems run by the engine each tick.
//!
//! Stateless systems are plain functions over the `World`. The wave
//! orchestrator is the one stateful sequencer and lives beside them.

pub mod cleanup;
pub mod enemies;
pub mod projectiles;
pub mod snapshot;
pub mod spawn_resolver;
pub mod wave_orchestrator;
