//! Dive-bombing jet.
//!
//! Cruises across the screen; once within trigger distance of the player it
//! dives (eased height, speed and roll), releases a bomb part-way through the
//! dive, climbs back and exits. A downed jet follows crash profile B: body
//! velocity that starts one step after death, accelerating down and away,
//! with a pitch-over and wobble.

use glam::Vec3;

use outrider_core::enums::{DestroyCause, EffectKind, Layer, ProjectileKind, Side};
use outrider_core::services::EffectRequest;
use outrider_core::tuning::JetTuning;

use super::{aim_velocity, require_layer, run_lifecycle};
use crate::body::EnemyBody;
use crate::context::{ProjectileSpec, TickContext};
use crate::motion::{self, ease_in_out};
use crate::random;
use crate::timers::Countdown;

const EXPLODE_DELAY_FLOOR: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetState {
    EnterCruise,
    Dive,
    Climb,
    Exit,
    Destroying,
}

#[derive(Debug, Clone, Default)]
struct Crash {
    velocity_pending: bool,
    x_speed: f32,
    z_speed: f32,
    down_speed: f32,
    pitch: f32,
    secs: f32,
    base_yaw: f32,
    base_roll: f32,
}

#[derive(Debug, Clone)]
pub struct Jet {
    pub state: JetState,
    has_dropped: bool,
    exploded: bool,
    env_enabled: bool,
    base_y: f32,
    dive_secs: f32,
    climb_secs: f32,
    roll: f32,
    target_roll: f32,
    current_speed: f32,
    crash: Crash,
    explode: Countdown,
}

impl Jet {
    pub fn new(t: &JetTuning) -> Self {
        Self {
            state: JetState::EnterCruise,
            has_dropped: false,
            exploded: false,
            env_enabled: true,
            base_y: 0.0,
            dive_secs: 0.0,
            climb_secs: 0.0,
            roll: 0.0,
            target_roll: 0.0,
            current_speed: t.cruise_speed,
            crash: Crash::default(),
            explode: Countdown::default(),
        }
    }

    pub fn on_spawned(&mut self, _body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        *self = Jet::new(&tuning.jet);
        self.env_enabled = require_layer(ctx.spatial, Layer::Environment, "jet", "crash impact");
    }

    pub fn tick(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.jet;

        if self.state == JetState::Destroying {
            self.crash_step(body, ctx);
            return;
        }

        match self.state {
            JetState::EnterCruise => {
                self.target_roll = 0.0;
                self.current_speed = t.cruise_speed;
                // Dive only once fully on screen.
                if let Some(player) = ctx.player.filter(|_| body.lifecycle.has_entered()) {
                    if self.should_trigger(body.position, player, t) {
                        self.start_dive(body, t);
                    }
                }
            }
            JetState::Dive => self.dive_step(body, ctx),
            JetState::Climb => self.climb_step(body, t, ctx.dt),
            JetState::Exit => {
                self.target_roll = 0.0;
                self.current_speed = t.cruise_speed;
            }
            JetState::Destroying => {}
        }

        body.move_forward_x(self.current_speed, ctx.dt);
        self.roll = motion::lerp(self.roll, self.target_roll, ctx.dt * t.rotation_smooth);
        body.rotation = motion::euler_degrees(0.0, base_yaw(body.side), self.roll);

        if !t.require_destroying_to_explode && self.env_enabled {
            let touching = ctx.spatial.overlap_sphere(
                body.position,
                t.crash_hit_radius,
                Layer::Environment,
                false,
            );
            if let Some(env) = touching.first() {
                let at = env.closest_point(body.position);
                self.explode_at(body, at, ctx);
                return;
            }
        }

        run_lifecycle(body, ctx);
    }

    pub fn on_killed(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        if self.state == JetState::Destroying {
            return;
        }
        let tuning = ctx.tuning;
        let t = &tuning.jet;

        log::debug!("jet {:?}: -> Destroying", body.id);
        self.state = JetState::Destroying;
        self.has_dropped = true;
        self.exploded = false;
        body.lifecycle.disable_despawn = true;

        let dir_x = body.side.direction();
        let mut base_x = if t.crash_initial_x_speed != 0.0 {
            t.crash_initial_x_speed
        } else {
            self.current_speed
        };
        base_x += random::symmetric(ctx.rng, t.crash_x_random_drift);

        self.crash = Crash {
            velocity_pending: true,
            x_speed: base_x.abs() * dir_x,
            z_speed: t.crash_initial_z_speed.abs(),
            down_speed: t.crash_initial_down_speed.abs(),
            pitch: 0.0,
            secs: 0.0,
            base_yaw: base_yaw(body.side),
            base_roll: motion::normalize_degrees(self.roll),
        };

        ctx.effect(EffectRequest::attached(EffectKind::SmokeFire, body.position, body.id));
        self.explode.arm(t.explode_fail_safe_secs.max(EXPLODE_DELAY_FLOOR));
    }

    fn should_trigger(&self, position: Vec3, player: Vec3, t: &JetTuning) -> bool {
        let dist = if t.horizontal_trigger_only {
            (position.x - player.x).abs()
        } else {
            position.distance(player)
        };
        dist <= t.trigger_distance
    }

    fn signed_tilt(side: Side, t: &JetTuning) -> f32 {
        match side {
            Side::Left => -t.dive_tilt_angle,
            Side::Right => t.dive_tilt_angle,
        }
    }

    fn start_dive(&mut self, body: &EnemyBody, t: &JetTuning) {
        log::debug!("jet {:?}: EnterCruise -> Dive", body.id);
        self.state = JetState::Dive;
        self.dive_secs = 0.0;
        self.base_y = body.position.y;
        self.target_roll = Self::signed_tilt(body.side, t);
    }

    fn dive_step(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.jet;
        self.dive_secs += ctx.dt;
        let t01 = (self.dive_secs / t.dive_duration.max(0.0001)).clamp(0.0, 1.0);
        let eased = ease_in_out(t01);

        body.position.y = motion::lerp(self.base_y, self.base_y - t.dive_depth, eased);
        self.current_speed = t.cruise_speed + t.dive_boost * eased;
        self.target_roll = Self::signed_tilt(body.side, t) * eased;

        if !self.has_dropped && t01 >= t.drop_at_dive_progress {
            self.drop_bomb(body, ctx);
        }

        if t01 >= 1.0 {
            log::debug!("jet {:?}: Dive -> Climb", body.id);
            self.state = JetState::Climb;
            self.climb_secs = 0.0;
        }
    }

    fn climb_step(&mut self, body: &mut EnemyBody, t: &JetTuning, dt: f32) {
        self.climb_secs += dt;
        let t01 = (self.climb_secs / t.climb_duration.max(0.0001)).clamp(0.0, 1.0);
        let y01 = ease_in_out(t01);

        body.position.y = motion::lerp(self.base_y - t.dive_depth, self.base_y, y01);
        // Boost fades out over the climb.
        self.current_speed = t.cruise_speed + t.dive_boost * (1.0 - ease_in_out(t01));
        self.target_roll = Self::signed_tilt(body.side, t) * (1.0 - y01);

        if t01 >= 1.0 {
            log::debug!("jet {:?}: Climb -> Exit", body.id);
            self.target_roll = 0.0;
            self.current_speed = t.cruise_speed;
            self.state = JetState::Exit;
        }
    }

    fn drop_bomb(&mut self, body: &EnemyBody, ctx: &mut TickContext<'_>) {
        self.has_dropped = true;
        let tuning = ctx.tuning;
        let bomb = &tuning.projectiles.bomb;
        let origin = body.position;
        // Aimed in the XY plane only; falls straight down without a target.
        let velocity = aim_velocity(origin, ctx.player, bomb.speed, true, Vec3::NEG_Y);
        ctx.fire(ProjectileSpec {
            kind: ProjectileKind::Bomb,
            origin,
            velocity,
            gravity: 0.0,
            shooter: body.id,
        });
    }

    fn crash_step(&mut self, body: &mut EnemyBody, ctx: &mut TickContext<'_>) {
        let tuning = ctx.tuning;
        let t = &tuning.jet;
        let dt = ctx.dt;

        if self.explode.tick(dt) {
            let at = body.position;
            self.explode_at(body, at, ctx);
            return;
        }

        // The body only starts moving on the step after death.
        if self.crash.velocity_pending {
            self.crash.velocity_pending = false;
            return;
        }

        let c = &mut self.crash;
        c.secs += dt;
        let accel_dir = if c.x_speed >= 0.0 { 1.0 } else { -1.0 };
        c.x_speed += accel_dir * t.crash_x_acceleration * dt;
        c.z_speed += t.crash_z_acceleration.abs() * dt;
        c.down_speed += t.crash_down_acceleration.abs() * dt;

        let velocity = Vec3::new(c.x_speed, -c.down_speed, c.z_speed);
        let delta = velocity * dt;

        if self.env_enabled && delta.length_squared() > 1e-7 {
            let hit = ctx.spatial.sphere_cast(
                body.position,
                t.crash_hit_radius,
                delta.normalize(),
                delta.length(),
                &[Layer::Environment],
                false,
            );
            if let Some(hit) = hit {
                self.explode_at(body, hit.point, ctx);
                return;
            }
        }

        body.position += delta;

        let c = &mut self.crash;
        c.pitch = motion::lerp(c.pitch, t.target_pitch_angle, dt * t.pitch_approach_speed.max(0.01));
        let pitch_wobble = (c.secs * t.pitch_wobble_frequency).sin() * t.pitch_wobble_amplitude;
        let roll_wobble = (c.secs * t.roll_wobble_frequency).sin() * t.roll_wobble_amplitude;
        let yaw_wobble = if t.yaw_wobble_amplitude <= 0.0 {
            0.0
        } else {
            (c.secs * t.yaw_wobble_frequency).sin() * t.yaw_wobble_amplitude
        };
        body.rotation = motion::euler_degrees(
            c.pitch + pitch_wobble,
            c.base_yaw + yaw_wobble,
            c.base_roll + roll_wobble,
        );
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
}

fn base_yaw(side: Side) -> f32 {
    match side {
        Side::Left => 0.0,
        Side::Right => 180.0,
    }
}
