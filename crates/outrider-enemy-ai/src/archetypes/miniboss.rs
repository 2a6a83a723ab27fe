//! Stationary turret boss.
//!
//! Drops onto the environment after spawning. Once any corner of its front
//! face is visible it latches despawn off and, after a short delay, pauses
//! the environment scroll. While engaged it fires two-shot bursts at the
//! player. Death resumes the scroll, but only if this boss paused it.

use glam::Vec3;

use outrider_core::constants::{LEVEL_ENVIRONMENT_SPEED, SPEED_EPSILON};
use outrider_core::enums::{DestroyCause, EffectKind, Layer, ProjectileKind, Side};
use outrider_core::events::GameEvent;
use outrider_core::projection::viewport_contains;
use outrider_core::services::{CameraProjection, EffectRequest};
use outrider_core::tuning::MiniBossTuning;
use outrider_core::types::Ray;

use super::{aim_velocity, require_layer, run_lifecycle};
use crate::body::EnemyBody;
use crate::context::{ProjectileSpec, TickContext};
use crate::motion;
use crate::timers::{Countdown, FireTimer, ShakeTimer};

const FIRE_INTERVAL_FLOOR: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MiniBossState {
    /// Not yet visible.
    Approach,
    /// Visible; waiting out the enter delay.
    Entering { since: f32 },
    Engaged,
    Dying,
}

#[derive(Debug, Clone)]
pub struct MiniBoss {
    pub state: MiniBossState,
    fire: FireTimer,
    burst: Countdown,
    shake: ShakeTimer,
    landing: bool,
    env_enabled: bool,
    paused_env: bool,
    speed_before_pause: f32,
    turret_degrees: f32,
    shown_half: bool,
    shown_quarter: bool,
    removal: Countdown,
}

impl MiniBoss {
    pub fn new(t: &MiniBossTuning) -> Self {
        let mut fire = FireTimer::new(t.fire_interval_secs, t.fire_interval_jitter, FIRE_INTERVAL_FLOOR);
        fire.prime(t.prepare_to_fire_secs);
        Self {
            state: MiniBossState::Approach,
            fire,
            burst: Countdown::default(),
            shake: ShakeTimer::default(),
            landing: t.snap_down_to_env,
            env_enabled: true,
            paused_env: false,
            speed_before_pause: LEVEL_ENVIRONMENT_SPEED,
            turret_degrees: 0.0,
            shown_half: false,
            shown_quarter: false,
            removal: Countdown::default(),
        }
    }

    pub fn aim_degrees(&self) -> f32 {
        self.turret_degrees
    }

    /// Whether this boss currently holds the environment paused.
    pub fn holds_env_pause(&self) -> bool {
        self.paused_env
    }

    pub fn is_landing(&self) -> bool {
        self.landing
    }

    pub fn on_spawned(&mut self, _body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        *self = MiniBoss::new(&tuning.miniboss);
        self.fire.reroll(ctx.rng);
        self.env_enabled = require_layer(ctx.spatial, Layer::Environment, "miniboss", "landing");
        if !self.env_enabled {
            self.landing = false;
        }
        if let Some(speed) = ctx.environment_speed() {
            if speed.abs() > SPEED_EPSILON {
                self.speed_before_pause = speed;
            }
        }
    }

    pub fn tick(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.miniboss;

        if self.state == MiniBossState::Dying {
            if self.removal.tick(ctx.dt) {
                body.request_removal();
            }
            return;
        }

        if let Some(speed) = ctx.environment_speed() {
            if speed.abs() > SPEED_EPSILON {
                self.speed_before_pause = speed;
            }
        }

        if self.landing {
            self.fall_step(body, ctx);
        }

        let Some(player) = ctx.player else {
            run_lifecycle(body, ctx);
            return;
        };

        match self.state {
            MiniBossState::Approach => {
                if ctx.camera.is_some_and(|c| any_corner_visible(body, c, t.viewport_margin)) {
                    log::debug!("miniboss {:?}: entered view", body.id);
                    self.state = MiniBossState::Entering { since: ctx.now };
                    if t.disable_despawn_once_entered {
                        body.lifecycle.disable_despawn = true;
                    }
                }
            }
            MiniBossState::Entering { since } => {
                if ctx.now - since >= t.enter_event_delay_secs {
                    log::info!("miniboss {:?}: engaged", body.id);
                    self.state = MiniBossState::Engaged;
                    if t.disable_despawn_once_entered {
                        body.lifecycle.disable_despawn = true;
                    }
                    if t.pause_env_on_enter {
                        self.pause_environment(ctx);
                    }
                }
            }
            MiniBossState::Engaged | MiniBossState::Dying => {}
        }

        self.rotate_turret(body, player, ctx);

        if self.state == MiniBossState::Engaged {
            if self.burst.tick(ctx.dt) {
                self.fire_one(body, 1, ctx);
            }
            if self.fire.tick(ctx.dt, ctx.rng) && !self.burst.is_armed() {
                self.fire_one(body, 0, ctx);
                self.burst.arm(t.second_shot_delay);
            }
        }

        run_lifecycle(body, ctx);
    }

    /// Escalate damage visuals at half and quarter health, once each.
    pub fn on_damaged(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let hp01 = body.health.fraction();
        if !self.shown_half && hp01 <= 0.5 {
            self.shown_half = true;
            ctx.effect(EffectRequest::attached(EffectKind::DamagedHalf, body.position, body.id));
        }
        if !self.shown_quarter && hp01 <= 0.25 {
            self.shown_quarter = true;
            ctx.effect(EffectRequest::attached(EffectKind::DamagedQuarter, body.position, body.id));
        }
    }

    pub fn on_killed(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        if self.state == MiniBossState::Dying {
            return;
        }
        let tuning = ctx.tuning;
        let t = &tuning.miniboss;

        log::info!("miniboss {:?}: destroyed", body.id);
        self.state = MiniBossState::Dying;
        self.landing = false;
        self.burst.cancel();
        self.shake.cancel();
        body.lifecycle.disable_despawn = true;

        if t.resume_env_on_death {
            self.resume_environment(ctx);
        }

        ctx.effect(EffectRequest::at(EffectKind::Explosion, body.position));
        body.announce_destroyed(ctx.bus, DestroyCause::Killed);
        self.removal.arm(t.destroy_after_secs.max(0.0));
    }

    fn pause_environment(&mut self, ctx: &mut TickContext<'_>) {
        if self.paused_env {
            return;
        }
        if let Some(speed) = ctx.environment_speed() {
            if speed.abs() > SPEED_EPSILON {
                self.speed_before_pause = speed;
            }
        }
        self.paused_env = true;
        log::info!("environment paused (resume speed {})", self.speed_before_pause);
        ctx.bus.publish(GameEvent::EnvironmentSpeedChanged { speed: 0.0 });
    }

    fn resume_environment(&mut self, ctx: &mut TickContext<'_>) {
        if !self.paused_env {
            return;
        }
        self.paused_env = false;
        log::info!("environment resumed at {}", self.speed_before_pause);
        ctx.bus.publish(GameEvent::EnvironmentSpeedChanged {
            speed: self.speed_before_pause,
        });
    }

    /// Settle the hull onto the environment below it.
    fn fall_step(&mut self, body: &mut EnemyBody, ctx: &TickContext<'_>) {
        let t = &ctx.tuning.miniboss;
        let step = t.fall_speed * ctx.dt;
        let ray = Ray::new(body.position, Vec3::NEG_Y);

        match ctx.spatial.raycast(&ray, t.ground_ray_distance, &[Layer::Environment], false) {
            Some(hit) => {
                let desired = hit.point.y + t.ground_surface_offset + body.half_extents.y;
                if body.position.y <= desired + 0.01 {
                    body.position.y = desired;
                    self.landing = false;
                    return;
                }
                body.position.y = (body.position.y - step).max(desired);
            }
            None => body.position.y -= step,
        }
    }

    fn rotate_turret(&mut self, body: &EnemyBody, player: Vec3, ctx: &mut TickContext<'_>) {
        let t = &ctx.tuning.miniboss;
        let to_player = player - body.position;
        if let Some(mut angle) = motion::planar_angle_degrees(to_player) {
            // Mirrored hull: turret angles are measured from the flipped axis.
            if body.side == Side::Right {
                angle += 180.0;
            }
            self.turret_degrees = motion::lerp_degrees(
                self.turret_degrees,
                angle,
                (t.turret_turn_speed * ctx.dt).clamp(0.0, 1.0),
            );
        }
        let shake_angle = t.shake_angle;
        let jitter = self.shake.angle(ctx.dt, shake_angle, ctx.rng);
        self.turret_degrees = motion::normalize_degrees(self.turret_degrees + jitter);
    }

    fn fire_one(&mut self, body: &EnemyBody, muzzle: usize, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.miniboss;
        let bullet = &tuning.projectiles.bullet;

        let mut offset = t.muzzle_offsets[muzzle.min(1)];
        offset.x *= body.side.direction();
        let origin = body.position + offset;
        let velocity = aim_velocity(origin, ctx.player, bullet.speed, true, Vec3::NEG_X);

        ctx.effect(EffectRequest::at(EffectKind::MuzzleFlash, origin));
        ctx.fire(ProjectileSpec {
            kind: ProjectileKind::Bullet,
            origin,
            velocity,
            gravity: 0.0,
            shooter: body.id,
        });
        self.shake.start(t.shake_duration);
    }
}

/// Any corner of the front face inside the viewport, inset by `margin`.
fn any_corner_visible(body: &EnemyBody, camera: &dyn CameraProjection, margin: f32) -> bool {
    body.bounds()
        .face_corners()
        .iter()
        .any(|&corner| viewport_contains(camera.world_to_viewport(corner), -margin))
}
