//! Small kinematic helpers: easing curves, interpolation, orientation.

use glam::{EulerRot, Quat, Vec3};

/// Ease-in-out curve from (0, 0) to (1, 1) with flat tangents.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Interpolation with `t` clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

pub fn lerp_vec(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Wrap an angle in degrees to (-180, 180].
pub fn normalize_degrees(a: f32) -> f32 {
    let mut a = a % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Clamp that tolerates `lo > hi` (the lower bound wins).
pub fn clamp_loose(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Angle interpolation along the shorter arc, degrees.
pub fn lerp_degrees(a: f32, b: f32, t: f32) -> f32 {
    a + normalize_degrees(b - a) * t.clamp(0.0, 1.0)
}

/// Step `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist < f32::EPSILON {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Orientation from pitch (x), yaw (y) and roll (z) in degrees, applied roll first.
pub fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Heading in the XY plane, degrees from +X.
pub fn planar_angle_degrees(dir: Vec3) -> Option<f32> {
    if dir.x * dir.x + dir.y * dir.y < 0.0001 {
        return None;
    }
    Some(dir.y.atan2(dir.x).to_degrees())
}

/// Critically damped spring toward a moving target.
///
/// Matches the usual game-engine `SmoothDamp`: exponential approach with
/// time constant `smooth_time` and no overshoot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothDamp {
    pub value: Vec3,
    pub velocity: Vec3,
}

impl SmoothDamp {
    pub fn reset(&mut self) {
        self.value = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
    }

    pub fn step(&mut self, target: Vec3, smooth_time: f32, dt: f32) -> Vec3 {
        if dt <= 0.0 {
            return self.value;
        }
        let smooth_time = smooth_time.max(0.0001);
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.value - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * exp;
        let mut output = target + (change + temp) * exp;

        // Do not overshoot.
        if (target - self.value).dot(output - target) > 0.0 {
            output = target;
            self.velocity = Vec3::ZERO;
        }
        self.value = output;
        output
    }
}
