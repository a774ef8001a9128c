use rand::Rng;

/// Source of the randomness used to seed and reset signal timers.
///
/// Production code wraps a `rand` generator in [`RngSource`]; tests can
/// script the exact sequence they need.
pub trait RandomSource {
    /// Fair coin flip.
    fn coin_flip(&mut self) -> bool;
    /// Uniform integer in `[low, high]`.
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32;
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn coin_flip(&mut self) -> bool {
        self.0.random_bool(0.5)
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        self.0.random_range(low..=high)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        (**self).range_inclusive(low, high)
    }
}
