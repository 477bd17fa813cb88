#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use rand::rngs::StdRng;
#[cfg(test)]
use rand::SeedableRng;
use rand::Rng;

/// Draws the index of the next quiz to present.
pub trait RandomSelector: Send + Sync {
    /// Uniform index in `0..pool_size`. Callers make sure the pool is not empty.
    fn pick(&self, pool_size: usize) -> usize;
}

/// Backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSelector;

impl RandomSelector for ThreadRngSelector {
    fn pick(&self, pool_size: usize) -> usize {
        debug_assert!(pool_size > 0, "cannot pick from an empty pool");
        rand::thread_rng().gen_range(0..pool_size)
    }
}

/// Reproducible draws.
#[cfg(test)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

#[cfg(test)]
impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[cfg(test)]
impl RandomSelector for SeededSelector {
    fn pick(&self, pool_size: usize) -> usize {
        debug_assert!(pool_size > 0, "cannot pick from an empty pool");
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..pool_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_range() {
        let selector = ThreadRngSelector;
        for size in 1..50 {
            assert!(selector.pick(size) < size);
        }
    }

    #[test]
    fn single_item_pool_always_yields_zero() {
        let selector = SeededSelector::new(42);
        assert!((0..20).all(|_| selector.pick(1) == 0));
    }

    #[test]
    fn same_seed_same_draws() {
        let a = SeededSelector::new(7);
        let b = SeededSelector::new(7);
        let draws_a: Vec<_> = (0..10).map(|_| a.pick(100)).collect();
        let draws_b: Vec<_> = (0..10).map(|_| b.pick(100)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn every_index_shows_up() {
        let selector = SeededSelector::new(1);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[selector.pick(4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
