//! Jitter helpers over the simulation RNG.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Uniform draw in `[-amount, amount)`; zero when `amount` is not positive.
pub fn symmetric(rng: &mut ChaCha8Rng, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.gen_range(-amount..amount)
    } else {
        0.0
    }
}

/// Uniform draw in `[range[0], range[1])`, tolerating reversed or empty ranges.
pub fn in_range(rng: &mut ChaCha8Rng, range: [f32; 2]) -> f32 {
    let (lo, hi) = if range[0] <= range[1] {
        (range[0], range[1])
    } else {
        (range[1], range[0])
    };
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Fair coin: -1 or +1.
pub fn sign(rng: &mut ChaCha8Rng) -> f32 {
    if rng.gen::<f32>() < 0.5 {
        -1.0
    } else {
        1.0
    }
}
