//! Uniform random source used by the spawner

use rand::Rng;
use rand_pcg::Pcg32;

/// Supplies uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded PCG generator, so a run can be reproduced from its seed
pub fn seeded(seed: u64) -> Pcg32 {
    use rand::SeedableRng;
    Pcg32::seed_from_u64(seed)
}
