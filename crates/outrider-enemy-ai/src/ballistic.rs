//! Lobbed-shot planning under constant gravity with a capped apex.
//!
//! The tank aims through a triangle: muzzle `A`, target `B`, and an apex point
//! `C` kept below the top of the screen. The launch velocity reaches `B` at the
//! planned time unless that arc would rise above `C`, in which case the
//! vertical speed is capped and arrival time is traded for a legible arc.

use glam::Vec3;

use outrider_core::constants::{BALLISTIC_MIN_DX, BALLISTIC_MIN_FLIGHT_TIME};

/// Planned launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticSolution {
    /// Initial velocity in the XY plane (z = 0).
    pub velocity: Vec3,
    /// Time at which the shell is back at the target's height.
    pub flight_time: f32,
    /// The unconstrained arc exceeded the ceiling and `vy` was capped.
    pub apex_clamped: bool,
}

/// Solve for a launch from `origin` to `target` that never rises above
/// `apex_ceiling` (world Y).
pub fn compute_launch(
    origin: Vec3,
    target: Vec3,
    apex_ceiling: f32,
    gravity: f32,
    muzzle_speed: f32,
) -> BallisticSolution {
    let g = gravity.max(0.01);
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;

    let planned_t = (dx.abs().max(BALLISTIC_MIN_DX) / muzzle_speed.max(0.1))
        .max(BALLISTIC_MIN_FLIGHT_TIME);

    let vy_ideal = (dy + 0.5 * g * planned_t * planned_t) / planned_t;
    let apex_ideal = apex_height(origin.y, vy_ideal, g);

    let (vy, apex_clamped) = if apex_ideal > apex_ceiling {
        let rise = (apex_ceiling - origin.y).max(0.01);
        ((2.0 * g * rise).sqrt(), true)
    } else {
        (vy_ideal, false)
    };

    let vx = dx / planned_t;

    let flight_time = if apex_clamped {
        descent_time(vy, dy, g).unwrap_or(planned_t)
    } else {
        planned_t
    };

    BallisticSolution {
        velocity: Vec3::new(vx, vy, 0.0),
        flight_time,
        apex_clamped,
    }
}

/// Highest Y reached by a shot leaving `origin_y` with vertical speed `vy`.
pub fn apex_height(origin_y: f32, vy: f32, gravity: f32) -> f32 {
    if vy <= 0.0 {
        return origin_y;
    }
    origin_y + vy * vy / (2.0 * gravity.max(0.01))
}

/// Position after `t` seconds of free flight.
pub fn position_at(origin: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    origin + velocity * t - Vec3::new(0.0, 0.5 * gravity * t * t, 0.0)
}

/// Later root of `vy t - g t^2 / 2 = dy`, if the height is reachable.
fn descent_time(vy: f32, dy: f32, g: f32) -> Option<f32> {
    let disc = vy * vy - 2.0 * g * dy;
    if disc < 0.0 {
        return None;
    }
    Some((vy + disc.sqrt()) / g)
}

/// Apex point `C` of the aiming triangle for muzzle `a` and target `b`.
///
/// Midway in X, `extra_height` above the higher endpoint, capped at
/// `screen_top - top_margin` when the screen top is known, and never lower
/// than half a unit above the higher endpoint.
pub fn apex_point(
    a: Vec3,
    b: Vec3,
    extra_height: f32,
    screen_top: Option<f32>,
    top_margin: f32,
) -> Vec3 {
    let x = (a.x + b.x) * 0.5;
    let high = a.y.max(b.y);
    let desired = high + extra_height;

    let y = match screen_top {
        Some(top) => desired.min(top - top_margin).max(high + 0.5),
        None => desired,
    };
    Vec3::new(x, y, a.z)
}
