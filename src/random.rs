use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random draw the race makes.
/// Lap outcomes and lap times only ever go through this trait,
/// so a test can swap in a scripted implementation.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`.
    fn next_int(&mut self, bound: u32) -> u32;

    /// Uniform double in `[low, high)`.
    fn next_double(&mut self, low: f64, high: f64) -> f64;
}

/// Default random source backed by `StdRng`.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Reproducible source, the same seed always replays the same race
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_int(&mut self, bound: u32) -> u32 {
        self.rng.random_range(0..bound)
    }

    fn next_double(&mut self, low: f64, high: f64) -> f64 {
        self.rng.random_range(low..high)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_int(&mut self, bound: u32) -> u32 {
        (**self).next_int(bound)
    }

    fn next_double(&mut self, low: f64, high: f64) -> f64 {
        (**self).next_double(low, high)
    }
}
