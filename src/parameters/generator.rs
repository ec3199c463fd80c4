use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::types::{BaselineCorrelationRule, SimulationConfig};
use crate::distribution::{SamplePool, Sampler};
use crate::error::AmdsimErr;
use crate::patient::types::PatientCharacteristics;
use crate::progression::error::InvariantErr;
use crate::progression::types::DiagnosticCounters;
use crate::streams::pool_seed;

/// Floor for multiplier draws; extreme draws from legitimate distributions
/// are clamped, not raised.
const MIN_MULTIPLIER: f64 = 1e-6;

const N_PARAMETERS: usize = 4;

/// Produces a fully populated [`PatientCharacteristics`] from a patient's
/// assigned trajectory class and baseline vision. Draws in a fixed order
/// from the patient's dedicated parameter stream, or from pre-sampled pools
/// when the configuration asks for them.
pub struct ParameterGenerator {
    classes: Vec<ClassParameterModel>,
    correlation: Option<BaselineCorrelationRule>,
    vision_ceiling: f64,
}

struct ClassParameterModel {
    name: String,
    samplers: [Sampler; N_PARAMETERS],
    pools: Option<[SamplePool; N_PARAMETERS]>,
}

impl ClassParameterModel {
    fn draw(&self, parameter: usize, patient_id: u64, rng: &mut ChaCha8Rng) -> f64 {
        match &self.pools {
            Some(pools) => pools[parameter].get(patient_id),
            None => self.samplers[parameter].sample(rng),
        }
    }
}

impl ParameterGenerator {
    pub fn new(config: &SimulationConfig) -> Result<ParameterGenerator, AmdsimErr> {
        let mut classes = Vec::with_capacity(config.trajectory_classes.len());
        for (class_index, class) in config.trajectory_classes.iter().enumerate() {
            let mut samplers = Vec::with_capacity(N_PARAMETERS);
            for (_, spec) in class.distributions.iter_named() {
                samplers.push(Sampler::new(spec)?);
            }
            let samplers: [Sampler; N_PARAMETERS] =
                samplers.try_into().expect("exactly four parameter samplers");

            let pools = match config.parameter_pool_size {
                Some(size) => {
                    let mut pools = Vec::with_capacity(N_PARAMETERS);
                    for (parameter, sampler) in samplers.iter().enumerate() {
                        let mut rng = ChaCha8Rng::seed_from_u64(pool_seed(
                            config.seed,
                            class_index,
                            parameter,
                        ));
                        pools.push(SamplePool::generate(sampler, &mut rng, size));
                    }
                    let pools: [SamplePool; N_PARAMETERS] =
                        pools.try_into().expect("exactly four parameter pools");
                    Some(pools)
                }
                None => None,
            };

            classes.push(ClassParameterModel {
                name: class.name.clone(),
                samplers,
                pools,
            });
        }
        Ok(ParameterGenerator {
            classes,
            correlation: config.baseline_correlation,
            vision_ceiling: config.vision_ceiling,
        })
    }

    pub fn generate(
        &self,
        class_index: usize,
        patient_id: u64,
        baseline_vision: f64,
        rng: &mut ChaCha8Rng,
        counters: &mut DiagnosticCounters,
    ) -> Result<PatientCharacteristics, AmdsimErr> {
        let class = match self.classes.get(class_index) {
            Some(c) => c,
            None => {
                return Err(InvariantErr::UnknownTrajectoryClass { index: class_index }.into());
            }
        };

        //----------------------------------------
        // Raw draws, fixed order
        let mut treatment_effect = class.draw(0, patient_id, rng);
        let mut progression = class.draw(1, patient_id, rng);
        let mut resistance = class.draw(2, patient_id, rng);
        let offset = class.draw(3, patient_id, rng);

        //----------------------------------------
        // Guard extreme draws
        if treatment_effect < MIN_MULTIPLIER {
            treatment_effect = MIN_MULTIPLIER;
            counters.multiplier_clamped += 1;
        }
        if progression < MIN_MULTIPLIER {
            progression = MIN_MULTIPLIER;
            counters.multiplier_clamped += 1;
        }
        if !(0.0..=1.0).contains(&resistance) {
            resistance = resistance.clamp(0.0, 1.0);
            counters.resistance_clamped += 1;
        }

        //----------------------------------------
        // Deterministic baseline-vision correlation, applied once
        if let Some(rule) = &self.correlation
            && baseline_vision > rule.baseline_threshold
        {
            treatment_effect *= rule.treatment_effect_factor;
            progression *= rule.progression_factor;
        }

        let max_achievable_vision = (baseline_vision + offset).min(self.vision_ceiling);

        Ok(PatientCharacteristics {
            class_index,
            class_name: class.name.clone(),
            treatment_effect_multiplier: treatment_effect,
            disease_progression_multiplier: progression,
            resistance_rate: resistance,
            max_achievable_vision,
        })
    }
}
