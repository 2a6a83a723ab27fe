//! Perspective camera used by the headless simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use outrider_core::services::CameraProjection;
use outrider_core::types::Ray;

/// Pinhole camera looking down +Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view, degrees.
    pub fov_y_degrees: f32,
    /// Width over height.
    pub aspect: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 7.5, -30.0),
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl PerspectiveCamera {
    fn half_height(&self) -> f32 {
        (self.fov_y_degrees.to_radians() * 0.5).tan()
    }
}

impl CameraProjection for PerspectiveCamera {
    fn world_to_viewport(&self, world: Vec3) -> Vec3 {
        let rel = world - self.position;
        let depth = rel.z;
        let d = if depth.abs() < 1e-6 { 1e-6_f32.copysign(depth) } else { depth };
        let h = self.half_height();
        let w = h * self.aspect;
        Vec3::new(
            0.5 + 0.5 * rel.x / (d * w),
            0.5 + 0.5 * rel.y / (d * h),
            depth,
        )
    }

    fn viewport_ray(&self, viewport_x: f32, viewport_y: f32) -> Ray {
        let h = self.half_height();
        let w = h * self.aspect;
        let dir = Vec3::new((viewport_x * 2.0 - 1.0) * w, (viewport_y * 2.0 - 1.0) * h, 1.0);
        Ray::new(self.position, dir)
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        Vec3::Z
    }
}
