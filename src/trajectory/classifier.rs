use rand::distributions::{Distribution, WeightedIndex};
use rand_chacha::ChaCha8Rng;

use crate::config::error::ConfigErr;
use crate::config::types::TrajectoryClassSpec;
use crate::error::AmdsimErr;

const PROPORTION_TOLERANCE: f64 = 1e-6;

/// Assigns each new patient to exactly one latent responder class by
/// weighted choice. Consumes one draw from the patient's dedicated
/// trajectory stream and nothing else.
pub struct TrajectoryClassifier {
    weights: WeightedIndex<f64>,
    n_classes: usize,
}

impl TrajectoryClassifier {
    pub fn new(classes: &[TrajectoryClassSpec]) -> Result<TrajectoryClassifier, AmdsimErr> {
        if classes.is_empty() {
            return Err(ConfigErr::NoTrajectoryClasses.into());
        }
        for class in classes {
            if !class.proportion.is_finite() || class.proportion <= 0.0 {
                return Err(ConfigErr::NonPositiveProportion {
                    class: class.name.clone(),
                    proportion: class.proportion,
                }
                .into());
            }
        }
        let sum: f64 = classes.iter().map(|c| c.proportion).sum();
        if (sum - 1.0).abs() > PROPORTION_TOLERANCE {
            return Err(ConfigErr::BadProportionSum(sum).into());
        }

        let proportions: Vec<f64> = classes.iter().map(|c| c.proportion).collect();
        Ok(TrajectoryClassifier {
            weights: WeightedIndex::new(&proportions).expect("proportions checked above"),
            n_classes: classes.len(),
        })
    }

    /// Returns the index of the assigned class.
    pub fn assign(&self, rng: &mut ChaCha8Rng) -> usize {
        self.weights.sample(rng)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ClassDistributions;
    use crate::distribution::types::DistributionSpec;
    use crate::streams::PatientStreams;

    fn class(name: &str, proportion: f64) -> TrajectoryClassSpec {
        let unit = DistributionSpec::Constant { value: 1.0 };
        TrajectoryClassSpec {
            name: String::from(name),
            proportion,
            distributions: ClassDistributions {
                treatment_effect_multiplier: unit.clone(),
                disease_progression_multiplier: unit.clone(),
                resistance_rate: DistributionSpec::Constant { value: 0.0 },
                max_vision_offset: unit,
            },
        }
    }

    #[test]
    fn empty_class_list_rejected() {
        assert!(TrajectoryClassifier::new(&[]).is_err());
    }

    #[test]
    fn proportion_sum_off_by_one_percent_rejected() {
        let classes = vec![class("good", 0.25), class("moderate", 0.40), class("poor", 0.34)];
        assert!(TrajectoryClassifier::new(&classes).is_err());
    }

    #[test]
    fn single_class_always_assigned() {
        let classes = vec![class("only", 1.0)];
        let classifier =
            TrajectoryClassifier::new(&classes).expect("failed to build classifier");
        for patient_id in 0..100 {
            let mut streams = PatientStreams::for_patient(24601, patient_id);
            assert_eq!(classifier.assign(&mut streams.trajectory), 0);
        }
    }

    #[test]
    fn empirical_proportions_track_configuration() {
        // 100k assignments should land within +/- 1% of each configured
        // proportion (about six sigma at this population size)
        let classes = vec![class("good", 0.25), class("moderate", 0.40), class("poor", 0.35)];
        let classifier =
            TrajectoryClassifier::new(&classes).expect("failed to build classifier");

        let n = 100_000;
        let mut counts = vec![0usize; classifier.n_classes()];
        for patient_id in 0..n {
            let mut streams = PatientStreams::for_patient(24601, patient_id);
            counts[classifier.assign(&mut streams.trajectory)] += 1;
        }

        let expected = [0.25, 0.40, 0.35];
        for (count, target) in counts.iter().zip(expected.iter()) {
            let observed = *count as f64 / n as f64;
            assert!(
                (observed - target).abs() < 0.01,
                "class proportion {} too far from {}",
                observed,
                target
            );
        }
    }
}
