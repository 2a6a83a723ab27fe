//! Per-archetype behaviour state machines.

pub mod drone;
pub mod jet;
pub mod miniboss;
pub mod tank;

pub use drone::{Drone, DroneState};
pub use jet::{Jet, JetState};
pub use miniboss::{MiniBoss, MiniBossState};
pub use tank::{Tank, TankState};

use glam::Vec3;

use outrider_core::enums::{DestroyCause, Layer};
use outrider_core::services::SpatialQuery;

use crate::body::EnemyBody;
use crate::context::TickContext;
use crate::lifecycle::LifecycleVerdict;

/// End-of-tick lifecycle check. An entered enemy that leaves the screen is
/// reported destroyed (despawned) and flagged for removal.
pub(crate) fn run_lifecycle(body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
    let verdict = body.lifecycle.tick(body.position, ctx.camera, ctx.now);
    if verdict == LifecycleVerdict::Despawn {
        log::debug!("{:?} {:?} left the screen", body.archetype, body.id);
        body.announce_destroyed(ctx.bus, DestroyCause::Despawned);
        body.request_removal();
    }
}

/// Straight-shot velocity toward `target`. With `flat_depth` the shot stays on
/// the shooter's Z plane. Degenerate or missing targets use `fallback`.
pub(crate) fn aim_velocity(
    origin: Vec3,
    target: Option<Vec3>,
    speed: f32,
    flat_depth: bool,
    fallback: Vec3,
) -> Vec3 {
    let dir = match target {
        Some(mut to) => {
            if flat_depth {
                to.z = origin.z;
            }
            let d = to - origin;
            if d.length_squared() < 0.0001 {
                fallback
            } else {
                d.normalize()
            }
        }
        None => fallback,
    };
    dir * speed
}

/// Log once at spawn when a required collision layer is missing.
pub(crate) fn require_layer(spatial: &dyn SpatialQuery, layer: Layer, who: &str, feature: &str) -> bool {
    let present = spatial.has_layer(layer);
    if !present {
        log::error!("{who}: collision layer {layer:?} not found; {feature} disabled");
    }
    present
}
