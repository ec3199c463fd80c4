use rand::Rng;

use crate::distribution::sample::Sampler;

/// A fixed pool of pre-generated draws, indexed with wraparound. Lets the
/// parameter generator hand out draws at enrollment time without touching a
/// distribution, which matters when enrolling tens of thousands of patients.
#[derive(Debug, Clone)]
pub struct SamplePool {
    samples: Vec<f64>,
}

impl SamplePool {
    pub fn generate<R: Rng + ?Sized>(sampler: &Sampler, rng: &mut R, size: usize) -> SamplePool {
        SamplePool {
            samples: (0..size).map(|_| sampler.sample(rng)).collect(),
        }
    }

    pub fn get(&self, index: u64) -> f64 {
        self.samples[(index % self.samples.len() as u64) as usize]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::types::DistributionSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pool_wraps_index() {
        let sampler = Sampler::new(&DistributionSpec::Normal {
            mean: 0.0,
            std: 1.0,
        })
        .expect("failed to build sampler");
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let pool = SamplePool::generate(&sampler, &mut rng, 16);
        assert_eq!(pool.len(), 16);
        assert_eq!(pool.get(3), pool.get(19));
        assert_eq!(pool.get(0), pool.get(16));
    }

    #[test]
    fn same_seed_same_pool() {
        let sampler = Sampler::new(&DistributionSpec::Uniform { min: 0.0, max: 1.0 })
            .expect("failed to build sampler");
        let mut rng_a = ChaCha8Rng::seed_from_u64(24601);
        let mut rng_b = ChaCha8Rng::seed_from_u64(24601);
        let pool_a = SamplePool::generate(&sampler, &mut rng_a, 64);
        let pool_b = SamplePool::generate(&sampler, &mut rng_b, 64);
        for i in 0..64 {
            assert_eq!(pool_a.get(i), pool_b.get(i));
        }
    }
}
