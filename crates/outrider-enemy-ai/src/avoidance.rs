//! Planar separation among neighbouring enemies.
//!
//! Pure vector sums, so the result does not depend on neighbour order.

use glam::Vec3;

use outrider_core::constants::{HARD_SEPARATION_BOOST, SPEED_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidanceParams {
    /// Neighbours farther than this are ignored.
    pub radius: f32,
    /// Inside this distance the repulsion is boosted.
    pub min_separation: f32,
    pub strength: f32,
}

/// Repulsion offset for a hover target given neighbour points (usually the
/// closest points on neighbour colliders). Depth (Z) is zeroed.
pub fn compute_offset(target: Vec3, neighbours: &[Vec3], params: &AvoidanceParams) -> Vec3 {
    let mut push = Vec3::ZERO;

    for &other in neighbours {
        let mut away = target - other;
        away.z = 0.0;

        let d = away.length();
        if d < SPEED_EPSILON || d > params.radius {
            continue;
        }
        let dir = away / d;

        if d < params.min_separation {
            let t = 1.0 - d / params.min_separation;
            push += dir * (t * params.strength * HARD_SEPARATION_BOOST);
        } else {
            let t = 1.0 - d / params.radius;
            push += dir * (t * params.strength);
        }
    }

    push.z = 0.0;
    push
}

/// Scale `v` down so its length does not exceed `max`.
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    v.clamp_length_max(max.max(0.0))
}
