//! Ground tank.
//!
//! Rolls in along the ground, stops when the player is within engage range
//! (or when another tank is too close ahead), lobs ballistic shells through an
//! apex point kept under the top of the screen, and resumes rolling when the
//! player drifts past the disengage distance.

use glam::Vec3;

use outrider_core::constants::SPEED_EPSILON;
use outrider_core::enums::{DestroyCause, EffectKind, EnemyArchetype, Layer, ProjectileKind};
use outrider_core::projection::{screen_top_y, screen_x_bounds};
use outrider_core::services::EffectRequest;
use outrider_core::tuning::TankTuning;

use super::{require_layer, run_lifecycle};
use crate::ballistic::{apex_point, compute_launch};
use crate::body::EnemyBody;
use crate::context::{ProjectileSpec, TickContext};
use crate::motion;
use crate::timers::{FireTimer, ShakeTimer};

const FIRE_INTERVAL_FLOOR: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankState {
    EnterCruise,
    EngageStop,
    FiringLoop,
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Tank {
    pub state: TankState,
    fire: FireTimer,
    shake: ShakeTimer,
    want_move: bool,
    desired_speed: f32,
    /// Cannon elevation in degrees (0 = level, facing +X).
    cannon_degrees: f32,
    /// Hull shake offset; visual only.
    visual_offset: Vec3,
    probe_enabled: bool,
}

impl Tank {
    pub fn new(t: &TankTuning) -> Self {
        Self {
            state: TankState::EnterCruise,
            fire: FireTimer::new(t.fire_interval_secs, t.fire_interval_jitter, FIRE_INTERVAL_FLOOR),
            shake: ShakeTimer::default(),
            want_move: true,
            desired_speed: t.cruise_speed,
            cannon_degrees: 0.0,
            visual_offset: Vec3::ZERO,
            probe_enabled: true,
        }
    }

    pub fn aim_degrees(&self) -> f32 {
        self.cannon_degrees
    }

    pub fn visual_offset(&self) -> Vec3 {
        self.visual_offset
    }

    pub fn is_moving(&self) -> bool {
        self.want_move && self.desired_speed > 0.0
    }

    pub fn on_spawned(&mut self, _body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.tank;
        *self = Tank::new(t);
        self.fire.reroll(ctx.rng);
        self.probe_enabled = require_layer(ctx.spatial, Layer::Enemy, "tank", "front probe");
        require_layer(ctx.spatial, Layer::Environment, "tank", "shell impacts");
    }

    pub fn tick(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.tank;

        if self.state == TankState::Destroyed {
            return;
        }
        if t.respond_to_env_pause && env_paused(ctx) {
            self.want_move = false;
            return;
        }

        self.visual_offset = self.shake.offset(ctx.dt, t.shake_magnitude, ctx.rng);

        match self.state {
            TankState::EnterCruise => {
                self.want_move = true;
                self.desired_speed = t.cruise_speed;

                if self.stop_for_tank_ahead(body, ctx) {
                    self.rotate_cannon(body, ctx);
                    run_lifecycle(body, ctx);
                    return;
                }

                if body.lifecycle.has_entered() && self.should_engage(body, ctx.player, t) {
                    log::debug!("tank {:?}: EnterCruise -> EngageStop", body.id);
                    self.halt(body, ctx);
                    self.state = TankState::EngageStop;
                    self.fire.prime(t.prepare_to_fire_secs);
                }
            }
            TankState::EngageStop => {
                if self.should_resume(body, ctx.player, t) {
                    self.resume_cruise(body, t);
                } else {
                    self.want_move = false;
                    self.desired_speed = 0.0;
                    self.rotate_cannon(body, ctx);
                    self.fire.elapsed += ctx.dt;
                    if self.fire.elapsed >= 0.0 {
                        log::debug!("tank {:?}: EngageStop -> FiringLoop", body.id);
                        self.state = TankState::FiringLoop;
                        self.fire.elapsed = 0.0;
                        self.fire.reroll(ctx.rng);
                    }
                }
            }
            TankState::FiringLoop => {
                if self.should_resume(body, ctx.player, t) {
                    self.resume_cruise(body, t);
                } else {
                    self.want_move = false;
                    self.desired_speed = 0.0;
                    self.rotate_cannon(body, ctx);
                    if self.fire.tick(ctx.dt, ctx.rng) {
                        self.fire_shell(body, ctx);
                    }
                }
            }
            TankState::Destroyed => {}
        }

        if self.want_move {
            body.move_forward_x(self.desired_speed, ctx.dt);
        }

        run_lifecycle(body, ctx);
    }

    /// Tanks die on the spot.
    pub fn on_killed(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        if self.state == TankState::Destroyed {
            return;
        }
        log::debug!("tank {:?}: -> Destroyed", body.id);
        self.state = TankState::Destroyed;
        self.want_move = false;
        self.shake.cancel();
        self.visual_offset = Vec3::ZERO;
        body.lifecycle.disable_despawn = true;

        ctx.effect(EffectRequest::at(EffectKind::BigExplosion, body.position));
        body.announce_destroyed(ctx.bus, DestroyCause::Killed);
        body.request_removal();
    }

    fn should_engage(&self, body: &EnemyBody, player: Option<Vec3>, t: &TankTuning) -> bool {
        player.is_some_and(|p| (body.position.x - p.x).abs() <= t.engage_distance)
    }

    fn should_resume(&self, body: &EnemyBody, player: Option<Vec3>, t: &TankTuning) -> bool {
        let threshold = (t.engage_distance + 0.5).max(t.disengage_distance);
        player.is_some_and(|p| (body.position.x - p.x).abs() > threshold)
    }

    fn resume_cruise(&mut self, body: &EnemyBody, t: &TankTuning) {
        log::debug!("tank {:?}: {:?} -> EnterCruise (player out of range)", body.id, self.state);
        self.state = TankState::EnterCruise;
        self.want_move = true;
        self.desired_speed = t.cruise_speed;
    }

    /// Stop, pull inside the screen and commit to the fight.
    fn halt(&mut self, body: &mut EnemyBody, ctx: &TickContext<'_>) {
        let t = &ctx.tuning.tank;
        self.want_move = false;
        self.desired_speed = 0.0;
        if t.clamp_engage_x_to_screen {
            if let Some(camera) = ctx.camera {
                let (left, right) = screen_x_bounds(camera, body.position.z);
                body.position.x =
                    motion::clamp_loose(body.position.x, left + t.screen_x_margin, right - t.screen_x_margin);
            }
        }
        body.lifecycle.disable_despawn = true;
    }

    /// Probe ahead for another tank. Returns true while one is within the
    /// required spacing; the first time that happens on screen the tank
    /// switches straight to firing.
    fn stop_for_tank_ahead(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) -> bool {
        let tuning = ctx.tuning;
        let t = &tuning.tank;
        if !self.probe_enabled || !body.lifecycle.has_entered() {
            return false;
        }

        let dir = body.side.direction();
        let origin = body.position + Vec3::Y * t.front_probe_up;
        let Some(hit) = ctx.spatial.sphere_cast(
            origin,
            t.front_probe_radius,
            Vec3::X * dir,
            t.front_probe_distance,
            &[Layer::Enemy],
            true,
        ) else {
            return false;
        };

        let other = hit.collider;
        if other.entity == body.id || other.archetype != Some(EnemyArchetype::Tank) {
            return false;
        }
        let other_x = other.bounds.center.x;
        let ahead = (other_x - body.position.x) * dir > 0.0;
        if !ahead {
            return false;
        }

        let required = body.half_extents.x + other.bounds.half_extents.x + t.min_spacing_x;
        if (other_x - body.position.x).abs() > required {
            return false;
        }

        log::debug!("tank {:?}: blocked by tank {:?} ahead", body.id, other.entity);
        self.halt(body, ctx);
        self.state = TankState::FiringLoop;
        self.fire.elapsed = 0.0;
        self.fire.reroll(ctx.rng);
        true
    }

    fn muzzle(&self, body: &EnemyBody, t: &TankTuning) -> Vec3 {
        let mut offset = t.muzzle_offset;
        offset.x *= body.side.direction();
        body.position + offset
    }

    fn apex_for(&self, muzzle: Vec3, target: Vec3, ctx: &TickContext<'_>) -> Vec3 {
        let t = &ctx.tuning.tank;
        let top = ctx.camera.map(|c| screen_top_y(c, muzzle.z));
        apex_point(muzzle, target, t.apex_extra_height, top, t.top_screen_margin)
    }

    /// Turn the cannon toward the apex point of the current firing triangle.
    fn rotate_cannon(&mut self, body: &EnemyBody, ctx: &TickContext<'_>) {
        let t = &ctx.tuning.tank;
        let Some(player) = ctx.player else {
            return;
        };
        let a = self.muzzle(body, t);
        let c = self.apex_for(a, player, ctx);
        let Some(target) = motion::planar_angle_degrees(c - a) else {
            return;
        };
        self.cannon_degrees =
            motion::lerp_degrees(self.cannon_degrees, target, (ctx.dt * t.cannon_turn_speed).clamp(0.0, 1.0));
    }

    fn fire_shell(&mut self, body: &EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.tank;
        let Some(player) = ctx.player else {
            return;
        };

        let a = self.muzzle(body, t);
        let c = self.apex_for(a, player, ctx);
        let solution = compute_launch(a, player, c.y, t.gravity, t.muzzle_speed);

        ctx.effect(EffectRequest::at(EffectKind::MuzzleFlash, a));
        ctx.fire(ProjectileSpec {
            kind: ProjectileKind::Shell,
            origin: a,
            velocity: solution.velocity,
            gravity: t.gravity.max(0.01),
            shooter: body.id,
        });
        self.shake.start(t.shake_duration);
    }
}

fn env_paused(ctx: &TickContext<'_>) -> bool {
    ctx.environment_speed()
        .is_some_and(|speed| speed.abs() <= SPEED_EPSILON)
}
