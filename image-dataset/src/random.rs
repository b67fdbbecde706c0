//! The random source used to place random crops.

use crate::common::*;

/// Draws uniformly distributed integers.
pub trait RandomSource {
    /// Draw an integer uniformly from the inclusive range `[low, high]`.
    fn uniform_int(&mut self, low: usize, high: usize) -> usize;
}

impl<R> RandomSource for R
where
    R: Rng + ?Sized,
{
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..=high)
    }
}

/// The generator shared by all draws of a dataset.
pub type SharedRng = Mutex<Box<dyn RngCore + Send>>;

/// Build a shared generator from a seed, or from entropy if no seed is given.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Mutex::new(Box::new(rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_int_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: HashSet<_> = (0..200).map(|_| rng.uniform_int(2, 4)).collect();
        assert_eq!(draws, [2, 3, 4].into_iter().collect());
        assert_eq!(rng.uniform_int(5, 5), 5);
    }

    #[test]
    fn seeded_generators_agree() {
        let draw = |rng: &SharedRng| {
            let mut guard = rng.lock().unwrap();
            (0..16).map(|_| guard.uniform_int(0, 1000)).collect::<Vec<_>>()
        };
        assert_eq!(draw(&shared_rng(Some(3))), draw(&shared_rng(Some(3))));
    }
}
