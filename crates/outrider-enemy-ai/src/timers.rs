//! Resumable timers driven by the per-frame tick.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::random;

/// Periodic fire cadence: base interval plus an independent jitter draw per
/// cycle, never shorter than `floor`.
#[derive(Debug, Clone, PartialEq)]
pub struct FireTimer {
    pub elapsed: f32,
    pub next_delay: f32,
    base: f32,
    jitter: f32,
    floor: f32,
}

impl FireTimer {
    pub fn new(base: f32, jitter: f32, floor: f32) -> Self {
        Self {
            elapsed: 0.0,
            next_delay: base.max(floor),
            base,
            jitter,
            floor,
        }
    }

    /// Draw the next interval.
    pub fn reroll(&mut self, rng: &mut ChaCha8Rng) {
        self.next_delay = (self.base + random::symmetric(rng, self.jitter)).max(self.floor);
    }

    /// Start a cycle after a preparation delay.
    pub fn prime(&mut self, prepare_secs: f32) {
        self.elapsed = -prepare_secs.max(0.0);
    }

    /// Advance; returns true when a shot is due, then restarts the cycle with
    /// a fresh interval.
    pub fn tick(&mut self, dt: f32, rng: &mut ChaCha8Rng) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.next_delay {
            self.elapsed = 0.0;
            self.reroll(rng);
            true
        } else {
            false
        }
    }
}

/// Short decaying random shake.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShakeTimer {
    elapsed: f32,
    duration: f32,
    active: bool,
}

impl ShakeTimer {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start unless already shaking.
    pub fn start(&mut self, duration: f32) {
        if self.active {
            return;
        }
        self.active = true;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0001);
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }

    /// Planar position offset with linearly decaying amplitude.
    pub fn offset(&mut self, dt: f32, magnitude: f32, rng: &mut ChaCha8Rng) -> Vec3 {
        let Some(k) = self.advance(dt) else {
            return Vec3::ZERO;
        };
        Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0) * magnitude * k
    }

    /// Random angle in `[-max_degrees, max_degrees)` at full amplitude.
    pub fn angle(&mut self, dt: f32, max_degrees: f32, rng: &mut ChaCha8Rng) -> f32 {
        match self.advance(dt) {
            Some(_) => random::symmetric(rng, max_degrees),
            None => 0.0,
        }
    }

    /// Remaining amplitude factor, or `None` once finished.
    fn advance(&mut self, dt: f32) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.cancel();
            return None;
        }
        Some(1.0 - self.elapsed / self.duration)
    }
}

/// One-shot countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    pub fn arm(&mut self, secs: f32) {
        self.remaining = Some(secs);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// True exactly once, on the tick the countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining.as_mut() {
            Some(r) => {
                *r -= dt;
                if *r <= 0.0 {
                    self.remaining = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn fire_timer_respects_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut timer = FireTimer::new(0.0, 0.0, 0.05);
        timer.reroll(&mut rng);
        assert_eq!(timer.next_delay, 0.05);
    }

    #[test]
    fn primed_timer_waits_for_preparation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut timer = FireTimer::new(0.5, 0.0, 0.05);
        timer.prime(0.5);
        let mut ticks = 0;
        while !timer.tick(0.1, &mut rng) {
            ticks += 1;
            assert!(ticks < 100);
        }
        // 0.5 s preparation plus 0.5 s interval.
        assert!((9..=10).contains(&ticks));
    }

    #[test]
    fn jittered_intervals_stay_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut timer = FireTimer::new(3.5, 0.5, 0.05);
        for _ in 0..100 {
            timer.reroll(&mut rng);
            assert!(timer.next_delay >= 3.0 && timer.next_delay < 4.0);
        }
    }

    #[test]
    fn countdown_fires_once() {
        let mut c = Countdown::default();
        c.arm(0.1);
        assert!(!c.tick(0.05));
        assert!(c.tick(0.06));
        assert!(!c.tick(0.06));
    }

    #[test]
    fn shake_ends() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut shake = ShakeTimer::default();
        shake.start(0.1);
        assert!(shake.is_active());
        for _ in 0..10 {
            shake.offset(0.02, 0.08, &mut rng);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.offset(0.02, 0.08, &mut rng), Vec3::ZERO);
    }
}
