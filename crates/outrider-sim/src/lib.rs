//! Simulation engine for OUTRIDER.
//!
//! Owns the hecs ECS world and the session's event bus, runs the level
//! director, wave orchestrator, enemy behaviours and projectiles at a fixed
//! tick rate, and produces `SimSnapshot`s for the host.

pub mod camera;
pub mod components;
pub mod engine;
pub mod level;
pub mod scenario;
pub mod spatial;
pub mod stats;
pub mod systems;

pub use outrider_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
