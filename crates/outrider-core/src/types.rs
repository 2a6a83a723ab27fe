//! Fundamental geometric and simulation types.
//!
//! World space is the gameplay space of a side-scroller rendered in 3D:
//! x = right, y = up, z = depth (away from the camera).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque identity of a simulated entity (enemy, projectile, player, proxy).
///
/// The simulation maps this to its ECS handle; the core never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f32,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// A half-line used for viewport picking and spatial casts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at `distance` along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Axis-aligned box used for collider bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Closest point on (or inside) the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min(), self.max())
    }

    /// The box grown by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> Aabb {
        Aabb::new(self.center, self.half_extents + Vec3::splat(amount.max(0.0)))
    }

    /// The four corners of the box face at its center depth (x/y extremes).
    pub fn face_corners(&self) -> [Vec3; 4] {
        let c = self.center;
        let e = self.half_extents;
        [
            Vec3::new(c.x - e.x, c.y - e.y, c.z),
            Vec3::new(c.x - e.x, c.y + e.y, c.z),
            Vec3::new(c.x + e.x, c.y - e.y, c.z),
            Vec3::new(c.x + e.x, c.y + e.y, c.z),
        ]
    }

    /// Slab test: distance along `ray` to the first intersection, if within `max_distance`.
    /// A ray starting inside the box hits at distance 0.
    pub fn ray_hit(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec3)> {
        let min = self.min();
        let max = self.max();
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            if d.abs() < 1e-8 {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            let mut axis_normal = Vec3::ZERO;
            axis_normal[axis] = -d.signum();
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_enter {
                t_enter = t0;
                normal = axis_normal;
            }
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        if normal == Vec3::ZERO {
            // Started inside: report the face opposing the travel direction.
            normal = -ray.direction;
        }
        Some((t_enter, normal))
    }
}
