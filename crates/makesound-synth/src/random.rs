//! Uniform random source owned by each voice.
//!
//! Every voice holds its own generator so that a fixed seed reproduces the
//! same sequence of note parameters, and no generator is shared between
//! voices or threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform draws used by the note parameter policy.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f32;

    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    fn next_int(&mut self, n: u32) -> u32;
}

/// [`RandomSource`] backed by a seeded [`SmallRng`].
///
/// ```rust
/// use makesound_synth::{RandomSource, SeededRandom};
///
/// let mut a = SeededRandom::new(7);
/// let mut b = SeededRandom::new(7);
/// assert_eq!(a.next_int(100), b.next_int(100));
/// ```
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn next_float(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    #[inline]
    fn next_int(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_are_in_unit_interval() {
        let mut rng = SeededRandom::new(42);
        for _ in 0..10_000 {
            let x = rng.next_float();
            assert!((0.0..1.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn ints_cover_range() {
        let mut rng = SeededRandom::new(3);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            let i = rng.next_int(7) as usize;
            assert!(i < 7);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn zero_bound_yields_zero() {
        let mut rng = SeededRandom::new(3);
        assert_eq!(rng.next_int(0), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(99);
        let mut b = SeededRandom::new(99);
        for _ in 0..100 {
            assert_eq!(a.next_float(), b.next_float());
            assert_eq!(a.next_int(3), b.next_int(3));
        }
    }
}
