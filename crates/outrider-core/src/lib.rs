//! Core types and definitions for the OUTRIDER enemy simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, enums, events and the event bus, damage, external service
//! contracts, tuning/scenario configuration, and snapshot state.
//! It has no dependency on the ECS or any runtime framework.

pub mod bus;
pub mod constants;
pub mod damage;
pub mod enums;
pub mod error;
pub mod events;
pub mod projection;
pub mod scenario;
pub mod services;
pub mod state;
pub mod tuning;
pub mod types;

pub use bus::{EventBus, SubscriptionId};
pub use error::ConfigError;
pub use events::{EventKind, GameEvent};

#[cfg(test)]
mod tests;
