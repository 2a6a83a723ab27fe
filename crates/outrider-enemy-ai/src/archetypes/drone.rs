//! Hover drone: cruises in, takes a hover slot beside the player, keeps its
//! distance from other enemies, and fires aimed bullets. On death it tumbles
//! and crashes (manual integration, sphere-cast against the environment).

use glam::{Quat, Vec3};

use outrider_core::enums::{DestroyCause, EffectKind, Layer, ProjectileKind, Side};
use outrider_core::projection::screen_x_bounds;
use outrider_core::services::EffectRequest;
use outrider_core::tuning::DroneTuning;

use super::{aim_velocity, require_layer, run_lifecycle};
use crate::avoidance::{clamp_magnitude, compute_offset, AvoidanceParams};
use crate::body::EnemyBody;
use crate::context::{ProjectileSpec, TickContext};
use crate::motion::{self, SmoothDamp};
use crate::random;
use crate::timers::{Countdown, FireTimer};

const FIRE_INTERVAL_FLOOR: f32 = 0.05;
const EXPLODE_DELAY_FLOOR: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroneState {
    EnterCruise,
    MoveToHover,
    FiringLoop,
    Destroying,
}

#[derive(Debug, Clone)]
pub struct Drone {
    pub state: DroneState,
    fire: FireTimer,
    move_to_hover_secs: f32,
    avoid: SmoothDamp,
    avoidance_enabled: bool,
    env_enabled: bool,
    crash_velocity: Vec3,
    explode: Countdown,
    exploded: bool,
    aim_degrees: Option<f32>,
}

impl Drone {
    pub fn new(t: &DroneTuning) -> Self {
        Self {
            state: DroneState::EnterCruise,
            fire: FireTimer::new(t.fire_interval_secs, t.fire_interval_jitter, FIRE_INTERVAL_FLOOR),
            move_to_hover_secs: 0.0,
            avoid: SmoothDamp::default(),
            avoidance_enabled: true,
            env_enabled: true,
            crash_velocity: Vec3::ZERO,
            explode: Countdown::default(),
            exploded: false,
            aim_degrees: None,
        }
    }

    pub fn aim_degrees(&self) -> Option<f32> {
        self.aim_degrees
    }

    pub fn on_spawned(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.drone;
        self.state = DroneState::EnterCruise;
        self.exploded = false;
        self.move_to_hover_secs = 0.0;
        self.avoid.reset();
        self.explode.cancel();
        self.crash_velocity = Vec3::ZERO;
        self.aim_degrees = None;
        self.fire = FireTimer::new(t.fire_interval_secs, t.fire_interval_jitter, FIRE_INTERVAL_FLOOR);
        self.fire.reroll(ctx.rng);

        self.avoidance_enabled = require_layer(ctx.spatial, Layer::Enemy, "drone", "avoidance");
        self.env_enabled = require_layer(ctx.spatial, Layer::Environment, "drone", "crash impact");

        if let Some(player) = ctx.player {
            apply_z_lock(body, player, t);
        }
    }

    pub fn tick(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.drone;

        if self.state == DroneState::Destroying {
            self.crash_step(body, ctx);
            return;
        }

        let Some(player) = ctx.player else {
            body.move_forward_x(t.cruise_speed, ctx.dt);
            run_lifecycle(body, ctx);
            return;
        };

        apply_z_lock(body, player, t);

        match self.state {
            DroneState::EnterCruise => {
                body.move_forward_x(t.cruise_speed, ctx.dt);

                // No engagement before the drone is on screen.
                if body.lifecycle.has_entered()
                    && (body.position.x - player.x).abs() <= t.engage_distance
                {
                    log::debug!("drone {:?}: EnterCruise -> MoveToHover", body.id);
                    self.state = DroneState::MoveToHover;
                    self.fire.elapsed = 0.0;
                    self.move_to_hover_secs = 0.0;
                }
            }
            DroneState::MoveToHover => {
                self.move_to_hover_secs += ctx.dt;

                let hover = self.hover_target(body, player, ctx);
                body.position =
                    motion::move_towards(body.position, hover, t.hover_snap_speed * ctx.dt);
                self.aim_at(body, player, t.aim_turn_speed, ctx.dt);

                let arrived = body.position.distance(hover) <= t.hover_arrive_distance;
                if arrived || self.move_to_hover_secs >= t.max_move_to_hover_secs {
                    log::debug!("drone {:?}: MoveToHover -> FiringLoop", body.id);
                    self.state = DroneState::FiringLoop;
                    self.fire.prime(t.prepare_to_fire_secs);
                    self.fire.reroll(ctx.rng);
                }
            }
            DroneState::FiringLoop => {
                let hover = self.hover_target(body, player, ctx);
                body.position = motion::lerp_vec(body.position, hover, ctx.dt * t.hover_snap_speed);
                self.aim_at(body, player, t.aim_turn_speed, ctx.dt);

                if self.fire.tick(ctx.dt, ctx.rng) {
                    self.fire_shot(body, player, ctx);
                }
            }
            DroneState::Destroying => {}
        }

        run_lifecycle(body, ctx);
    }

    /// Hit points ran out: start the crash.
    pub fn on_killed(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        if self.state == DroneState::Destroying {
            return;
        }
        let tuning = ctx.tuning;
        let t = &tuning.drone;

        log::debug!("drone {:?}: -> Destroying", body.id);
        self.state = DroneState::Destroying;
        body.lifecycle.disable_despawn = true;

        let dir_x = random::sign(ctx.rng);
        let x = random::in_range(ctx.rng, t.crash_x_speed_range) * dir_x;
        let y = -random::in_range(ctx.rng, t.crash_down_speed_range);
        let z = random::in_range(ctx.rng, t.crash_z_speed_range);
        self.crash_velocity = Vec3::new(x, y, z);

        ctx.effect(EffectRequest::attached(EffectKind::SmokeFire, body.position, body.id));

        self.explode.arm(t.explode_after_secs.max(EXPLODE_DELAY_FLOOR));
    }

    /// Crash profile A: accelerate by hand, sweep a sphere along each step.
    fn crash_step(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.drone;
        let dt = ctx.dt;

        if self.explode.tick(dt) {
            let at = body.position;
            self.explode_at(body, at, ctx);
            return;
        }

        let accel = t.crash_acceleration;
        let v = &mut self.crash_velocity;
        let sign_x = if v.x == 0.0 { 1.0 } else { v.x.signum() };
        v.x += accel.x * dt * sign_x;
        v.y -= accel.y.abs() * dt;
        v.z += accel.z.abs() * dt;

        let start = body.position;
        let delta = self.crash_velocity * dt;

        if !self.exploded && self.env_enabled && delta.length_squared() > 1e-7 {
            let hit = ctx.spatial.sphere_cast(
                start,
                t.crash_hit_radius,
                delta.normalize(),
                delta.length(),
                &[Layer::Environment],
                false,
            );
            if let Some(hit) = hit {
                body.position = hit.point + hit.normal * t.crash_surface_offset;
                if t.explode_on_env_hit {
                    let at = body.position;
                    self.explode_at(body, at, ctx);
                } else {
                    self.crash_velocity = Vec3::ZERO;
                }
                return;
            }
        }

        body.position = start + delta;
        body.rotation *= motion::euler_degrees(120.0 * dt, 90.0 * dt, 200.0 * dt);
    }

    fn explode_at(&mut self, body: &mut EnemyBody, at: Vec3, ctx: &mut TickContext<'_>) {
        if self.exploded {
            return;
        }
        self.exploded = true;
        self.explode.cancel();

        ctx.effect(EffectRequest::at(EffectKind::Explosion, at));
        body.announce_destroyed(ctx.bus, DestroyCause::Killed);
        body.request_removal();
    }

    /// Hover slot plus smoothed avoidance, kept above the player.
    fn hover_target(&mut self, body: &EnemyBody, player: Vec3, ctx: &mut TickContext<'_>) -> Vec3 {
        let tuning = ctx.tuning;
        let t = &tuning.drone;
        let base = hover_base(body, player, ctx, t);

        let raw = if self.avoidance_enabled {
            let neighbours: Vec<Vec3> = ctx
                .spatial
                .overlap_sphere(base, t.avoid_radius, Layer::Enemy, t.include_trigger_enemies)
                .into_iter()
                .filter(|c| c.entity != body.id)
                .map(|c| c.closest_point(base))
                .collect();
            let params = AvoidanceParams {
                radius: t.avoid_radius,
                min_separation: t.min_separation,
                strength: t.avoid_strength,
            };
            compute_offset(base, &neighbours, &params)
        } else {
            Vec3::ZERO
        };
        let raw = clamp_magnitude(raw, t.max_avoid_offset);
        let smoothed = self.avoid.step(raw, t.avoid_smooth_time.max(0.01), ctx.dt);

        let mut target = base + smoothed;
        target.y = target.y.max(player.y + t.min_above_player_y);
        if t.lock_z_to_player {
            target.z = player.z;
        }
        target
    }

    fn aim_at(&mut self, body: &mut EnemyBody, player: Vec3, turn_speed: f32, dt: f32) {
        let to_player = player - body.position;
        if to_player.length_squared() < 0.0001 {
            return;
        }
        let target = Quat::from_rotation_arc(Vec3::X, to_player.normalize());
        body.rotation = body.rotation.slerp(target, (dt * turn_speed).clamp(0.0, 1.0));
        self.aim_degrees = motion::planar_angle_degrees(to_player);
    }

    fn fire_shot(&mut self, body: &EnemyBody, player: Vec3, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let bullet = &tuning.projectiles.bullet;
        let origin = body.position;
        let velocity = aim_velocity(origin, Some(player), bullet.speed, true, Vec3::NEG_X);

        ctx.effect(EffectRequest::at(EffectKind::MuzzleFlash, origin));
        ctx.fire(ProjectileSpec {
            kind: ProjectileKind::Bullet,
            origin,
            velocity,
            gravity: 0.0,
            shooter: body.id,
        });
    }
}

fn apply_z_lock(body: &mut EnemyBody, player: Vec3, t: &DroneTuning) {
    if t.lock_z_to_player {
        body.position.z = player.z;
    }
}

/// Hover slot on the spawn side, at least `min_distance_to_player_x` away and
/// clamped inside the screen horizontally.
fn hover_base(body: &EnemyBody, player: Vec3, ctx: &TickContext<'_>, t: &DroneTuning) -> Vec3 {
    let x_side = t.hover_offset_x.abs();
    let signed_x = if body.side == Side::Right { -x_side } else { x_side };

    let mut desired_x = player.x + signed_x;
    let dx = desired_x - player.x;
    if dx.abs() < t.min_distance_to_player_x {
        let dir = if dx == 0.0 { signed_x } else { dx };
        desired_x = player.x + sign_or_one(dir) * t.min_distance_to_player_x;
    }

    let desired_y = player.y + t.min_above_player_y.max(t.lane_y_offset);
    let desired_z = if t.lock_z_to_player { player.z } else { body.position.z };
    let mut target = Vec3::new(desired_x, desired_y, desired_z);

    if t.clamp_x_to_screen {
        if let Some(camera) = ctx.camera {
            let (left, right) = screen_x_bounds(camera, target.z);
            target.x = motion::clamp_loose(target.x, left + t.screen_x_margin, right - t.screen_x_margin);
        }
    }
    target
}

fn sign_or_one(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}
