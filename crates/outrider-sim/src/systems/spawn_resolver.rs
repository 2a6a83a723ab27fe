//! Spawn placement: maps a `SpawnRequest` to a world position.
//!
//! Offscreen spawns sit just past the left or right screen edge on the
//! player's depth lane; fixed spawns use the configured point. No state is
//! kept between calls. Randomness (Y band, Z jitter) comes from the
//! simulation RNG so placement is reproducible per seed.

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use outrider_core::constants::{SPAWN_VIEWPORT_LEFT_X, SPAWN_VIEWPORT_RIGHT_X};
use outrider_core::enums::{Side, SpawnMode};
use outrider_core::projection::{screen_top_y, viewport_to_world_on_z_plane};
use outrider_core::scenario::SpawnRequest;
use outrider_core::services::CameraProjection;
use outrider_enemy_ai::motion::clamp_loose;
use outrider_enemy_ai::random;

/// Resolve the world position for one spawn of `request`.
pub fn resolve(
    request: &SpawnRequest,
    camera: &dyn CameraProjection,
    player: Vec3,
    side: Side,
    rng: &mut ChaCha8Rng,
) -> Vec3 {
    match request.mode {
        SpawnMode::FixedWorld => {
            let mut position = request.fixed_world_position;
            if request.use_player_z {
                position.z = lane_z(request, player, rng);
            }
            position
        }
        SpawnMode::Offscreen => offscreen(request, camera, player, side, rng),
    }
}

fn lane_z(request: &SpawnRequest, player: Vec3, rng: &mut ChaCha8Rng) -> f32 {
    player.z + request.z_offset + random::symmetric(rng, request.z_random_range)
}

fn offscreen(
    request: &SpawnRequest,
    camera: &dyn CameraProjection,
    player: Vec3,
    side: Side,
    rng: &mut ChaCha8Rng,
) -> Vec3 {
    let plane_z = lane_z(request, player, rng);
    let vx = match side {
        Side::Left => SPAWN_VIEWPORT_LEFT_X,
        Side::Right => SPAWN_VIEWPORT_RIGHT_X,
    };
    let vy = random::in_range(rng, [request.min_y_viewport, request.max_y_viewport]);

    let mut position = viewport_to_world_on_z_plane(camera, vx, vy, plane_z);
    position.x += side.outward() * request.offscreen_margin_x;

    let min_y = player.y + request.min_above_player_y;
    let max_y = screen_top_y(camera, plane_z) - request.max_below_top_world.max(0.0);
    position.y = clamp_loose(position.y, min_y, max_y);
    position.z = plane_z;
    position
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::camera::PerspectiveCamera;
    use outrider_core::enums::EnemyArchetype;
    use outrider_core::projection::screen_x_bounds;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[test]
    fn offscreen_left_is_past_the_edge_by_margin() {
        let camera = PerspectiveCamera::default();
        let player = Vec3::new(0.0, 1.0, 0.0);
        let mut request = SpawnRequest::new(EnemyArchetype::Drone, 1);
        request.offscreen_margin_x = 3.0;
        request.z_random_range = 2.0;
        let mut rng = rng();

        for _ in 0..20 {
            let p = resolve(&request, &camera, player, Side::Left, &mut rng);
            let (left, _) = screen_x_bounds(&camera, p.z);
            assert!(p.x < left - request.offscreen_margin_x, "{p} vs edge {left}");
            assert!(p.z >= -2.0 && p.z < 2.0);
        }
    }

    #[test]
    fn offscreen_right_mirrors_left() {
        let camera = PerspectiveCamera::default();
        let request = SpawnRequest::new(EnemyArchetype::Jet, 1);
        let p = resolve(&request, &camera, Vec3::ZERO, Side::Right, &mut rng());
        let (_, right) = screen_x_bounds(&camera, p.z);
        assert!(p.x > right + request.offscreen_margin_x);
    }

    #[test]
    fn height_clamped_between_player_floor_and_screen_top() {
        let camera = PerspectiveCamera::default();
        let mut request = SpawnRequest::new(EnemyArchetype::Drone, 1);
        request.min_y_viewport = 0.0;
        request.max_y_viewport = 0.0;
        request.min_above_player_y = 4.0;
        let player = Vec3::new(0.0, 2.0, 0.0);
        let p = resolve(&request, &camera, player, Side::Left, &mut rng());
        assert!((p.y - 6.0).abs() < 1e-4);

        request.min_y_viewport = 1.0;
        request.max_y_viewport = 1.0;
        request.min_above_player_y = 0.0;
        request.max_below_top_world = 5.0;
        let p = resolve(&request, &camera, player, Side::Left, &mut rng());
        assert!((p.y - (screen_top_y(&camera, 0.0) - 5.0)).abs() < 1e-3);
    }

    #[test]
    fn fixed_world_snaps_lane_only_when_asked() {
        let camera = PerspectiveCamera::default();
        let player = Vec3::new(0.0, 0.0, 4.0);
        let mut request = SpawnRequest::new(EnemyArchetype::MiniBoss, 1).fixed_at(Vec3::new(5.0, 8.0, -1.0));
        request.z_offset = 1.0;

        let p = resolve(&request, &camera, player, Side::Left, &mut rng());
        assert_eq!(p, Vec3::new(5.0, 8.0, 5.0));

        request.use_player_z = false;
        let p = resolve(&request, &camera, player, Side::Left, &mut rng());
        assert_eq!(p, Vec3::new(5.0, 8.0, -1.0));
    }
}
