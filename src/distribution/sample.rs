use rand::Rng;
use rand::distributions::Distribution;
use statrs::distribution::{Beta, LogNormal, Normal, Uniform};

use crate::distribution::error::DistributionErr;
use crate::distribution::types::DistributionSpec;
use crate::error::AmdsimErr;

/// A compiled, known-valid distribution ready to sample from.
#[derive(Debug, Clone)]
pub enum Sampler {
    Normal(Normal),
    Lognormal(LogNormal),
    Beta(Beta),
    Uniform(Uniform),
    Constant(f64),
}

impl Sampler {
    /// Validates the spec's parameters and wraps the corresponding statrs
    /// distribution. All parameter problems surface here, at configuration
    /// time, never mid-run.
    pub fn new(spec: &DistributionSpec) -> Result<Sampler, AmdsimErr> {
        match *spec {
            DistributionSpec::Normal { mean, std } => {
                if !mean.is_finite() {
                    return Err(DistributionErr::NonFiniteParameter(mean).into());
                }
                if !std.is_finite() || std <= 0.0 {
                    return Err(DistributionErr::BadNormalStd(std).into());
                }
                Ok(Sampler::Normal(
                    Normal::new(mean, std).expect("normal parameters checked above"),
                ))
            }
            DistributionSpec::Lognormal { location, scale } => {
                if !location.is_finite() {
                    return Err(DistributionErr::NonFiniteParameter(location).into());
                }
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(DistributionErr::BadLognormalScale(scale).into());
                }
                Ok(Sampler::Lognormal(
                    LogNormal::new(location, scale).expect("lognormal parameters checked above"),
                ))
            }
            DistributionSpec::Beta { alpha, beta } => {
                if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
                    return Err(DistributionErr::BadBetaShape { alpha, beta }.into());
                }
                Ok(Sampler::Beta(
                    Beta::new(alpha, beta).expect("beta parameters checked above"),
                ))
            }
            DistributionSpec::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(DistributionErr::BadUniformBounds { min, max }.into());
                }
                Ok(Sampler::Uniform(
                    Uniform::new(min, max).expect("uniform bounds checked above"),
                ))
            }
            DistributionSpec::Constant { value } => {
                if !value.is_finite() {
                    return Err(DistributionErr::NonFiniteParameter(value).into());
                }
                Ok(Sampler::Constant(value))
            }
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Lognormal(d) => d.sample(rng),
            Sampler::Beta(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Constant(value) => *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn negative_std_rejected() {
        if let Err(e) = Sampler::new(&DistributionSpec::Normal {
            mean: 1.0,
            std: -0.2,
        }) {
            assert_eq!(
                String::from(
                    "while building sampling distribution: normal standard \
                    deviation should be positive and finite; got -0.2"
                ),
                format!("{}", e)
            );
        } else {
            panic!()
        }
    }

    #[test]
    fn bad_beta_shape_rejected() {
        assert!(
            Sampler::new(&DistributionSpec::Beta {
                alpha: 0.0,
                beta: 2.0
            })
            .is_err()
        );
        assert!(
            Sampler::new(&DistributionSpec::Beta {
                alpha: 2.0,
                beta: -1.0
            })
            .is_err()
        );
    }

    #[test]
    fn degenerate_uniform_rejected() {
        assert!(
            Sampler::new(&DistributionSpec::Uniform { min: 3.0, max: 3.0 }).is_err()
        );
    }

    #[test]
    fn beta_samples_stay_in_unit_interval() {
        let sampler = Sampler::new(&DistributionSpec::Beta {
            alpha: 2.0,
            beta: 5.0,
        })
        .expect("failed to build beta sampler");
        let mut rng = ChaCha8Rng::seed_from_u64(24601);
        for _ in 0..1000 {
            let x = sampler.sample(&mut rng);
            assert!((0.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn lognormal_samples_positive() {
        let sampler = Sampler::new(&DistributionSpec::Lognormal {
            location: 0.0,
            scale: 0.4,
        })
        .expect("failed to build lognormal sampler");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(sampler.sample(&mut rng) > 0.0);
        }
    }

    #[test]
    fn constant_ignores_rng() {
        let sampler =
            Sampler::new(&DistributionSpec::Constant { value: 0.15 }).expect("constant sampler");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sampler.sample(&mut rng), 0.15);
        assert_eq!(sampler.sample(&mut rng), 0.15);
    }
}
