//! Random helpers shared by the shuffle and the spiral placement.
//!
//! Everything here takes the generator by reference so callers can inject a
//! seeded [`rand::rngs::StdRng`] and get reproducible layouts.
use rand::RngCore;

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float centered on zero, in the range [-0.5, 0.5].
#[inline]
pub(crate) fn rand_centered(rng: &mut dyn RngCore) -> f32 {
    rand01(rng) - 0.5
}

/// Uniform index in `0..upper`. `upper` must be non-zero.
#[inline]
fn rand_index(rng: &mut dyn RngCore, upper: usize) -> usize {
    debug_assert!(upper > 0, "upper must be > 0");
    // Multiply-shift keeps the bias below 2^-32 for any realistic collection size.
    ((rng.next_u64() >> 32).wrapping_mul(upper as u64) >> 32) as usize
}

/// In-place Fisher–Yates shuffle driven by the supplied generator.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RngCore) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}
