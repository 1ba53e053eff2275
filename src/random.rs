use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    fn below(&mut self, n: usize) -> usize;

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi);
        lo + self.below(hi - lo + 1)
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.below(items.len())])
        }
    }
}

macro_rules! impl_random_source {
    ($($rng:ty),*) => {
        $(
            impl RandomSource for $rng {
                fn next_f64(&mut self) -> f64 {
                    self.gen::<f64>()
                }

                fn below(&mut self, n: usize) -> usize {
                    self.gen_range(0..n)
                }
            }
        )*
    };
}

impl_random_source!(StdRng, ThreadRng);

impl<R: RandomSource> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn below(&mut self, n: usize) -> usize {
        (**self).below(n)
    }
}
