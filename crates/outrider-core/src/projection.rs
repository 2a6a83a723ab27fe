//! Viewport / depth-plane geometry shared by spawn placement and enemy AI.
//!
//! Gameplay happens on planes of constant Z (depth lanes). These helpers cast
//! camera rays through viewport points onto such a plane.

use glam::Vec3;

use crate::constants::DEGENERATE_RAY_FALLBACK_DISTANCE;
use crate::services::CameraProjection;
use crate::types::Ray;

/// Intersection of `ray` with the plane `z = plane_z`.
///
/// Returns `None` when the ray is parallel to the plane or the plane lies
/// behind the ray origin.
pub fn ray_z_plane(ray: &Ray, plane_z: f32) -> Option<Vec3> {
    let denom = ray.direction.z;
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_z - ray.origin.z) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.point_at(t))
}

/// World point under viewport `(vx, vy)` on the plane `z = plane_z`.
///
/// Degenerate rays fall back to a point a fixed distance ahead of the camera.
pub fn viewport_to_world_on_z_plane(
    camera: &dyn CameraProjection,
    vx: f32,
    vy: f32,
    plane_z: f32,
) -> Vec3 {
    let ray = camera.viewport_ray(vx, vy);
    ray_z_plane(&ray, plane_z).unwrap_or_else(|| {
        camera.position() + camera.forward() * DEGENERATE_RAY_FALLBACK_DISTANCE
    })
}

/// World X of the left and right screen edges at mid-height on a depth plane.
pub fn screen_x_bounds(camera: &dyn CameraProjection, plane_z: f32) -> (f32, f32) {
    let left = viewport_to_world_on_z_plane(camera, 0.0, 0.5, plane_z);
    let right = viewport_to_world_on_z_plane(camera, 1.0, 0.5, plane_z);
    (left.x.min(right.x), left.x.max(right.x))
}

/// World Y of the top screen edge at mid-width on a depth plane.
pub fn screen_top_y(camera: &dyn CameraProjection, plane_z: f32) -> f32 {
    viewport_to_world_on_z_plane(camera, 0.5, 1.0, plane_z).y
}

/// Whether a viewport-space point lies in front of the camera and within
/// `[-margin, 1 + margin]` on both axes.
pub fn viewport_contains(viewport: Vec3, margin: f32) -> bool {
    viewport.z > 0.0
        && viewport.x >= -margin
        && viewport.x <= 1.0 + margin
        && viewport.y >= -margin
        && viewport.y <= 1.0 + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_plane_ahead() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let hit = ray_z_plane(&ray, 5.0).unwrap();
        assert!((hit.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn parallel_or_behind_misses() {
        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(ray_z_plane(&parallel, 5.0).is_none());
        let away = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(ray_z_plane(&away, 5.0).is_none());
    }

    #[test]
    fn viewport_margin_check() {
        assert!(viewport_contains(Vec3::new(0.5, 0.5, 3.0), 0.0));
        assert!(!viewport_contains(Vec3::new(1.05, 0.5, 3.0), 0.0));
        assert!(viewport_contains(Vec3::new(1.05, 0.5, 3.0), 0.1));
        assert!(!viewport_contains(Vec3::new(0.5, 0.5, -1.0), 0.1));
    }
}
