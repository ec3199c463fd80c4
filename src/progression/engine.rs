use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::types::{CatastrophicEventDefinition, SimulationConfig};
use crate::distribution::{DistributionSpec, Sampler};
use crate::error::AmdsimErr;
use crate::patient::types::{DiscontinuationReason, PatientState};
use crate::progression::error::InvariantErr;
use crate::progression::types::{
    DAYS_PER_MONTH, DiagnosticCounters, FORTNIGHT_DAYS, StepDecision, StepInput, StepOutcome,
    snap_to_fortnights,
};

/// The fortnightly update loop for one patient: treatment effect under the
/// achievable-vision ceiling with resistance decay, background decline,
/// measurement noise, and catastrophic event sampling. Advances ACTIVE
/// patients only; lifecycle policy stays with the caller.
pub struct DiseaseProgressionEngine {
    base_effect_per_dose: f64,
    base_decline_per_fortnight: f64,
    severity_threshold: Option<f64>,
    vision_floor: f64,
    vision_ceiling: f64,
    noise: Option<Sampler>,
    events: Vec<EventModel>,
}

struct EventModel {
    def: CatastrophicEventDefinition,
    impact: Sampler,
}

impl DiseaseProgressionEngine {
    pub fn new(config: &SimulationConfig) -> Result<DiseaseProgressionEngine, AmdsimErr> {
        let noise = if config.progression.measurement_noise_std > 0.0 {
            Some(Sampler::new(&DistributionSpec::Normal {
                mean: 0.0,
                std: config.progression.measurement_noise_std,
            })?)
        } else {
            None
        };
        let mut events = Vec::with_capacity(config.catastrophic_events.len());
        for def in &config.catastrophic_events {
            events.push(EventModel {
                impact: Sampler::new(&def.impact)?,
                def: def.clone(),
            });
        }
        Ok(DiseaseProgressionEngine {
            base_effect_per_dose: config.progression.base_effect_per_dose,
            base_decline_per_fortnight: config.progression.base_decline_per_fortnight,
            severity_threshold: config.progression.severity_discontinuation_threshold,
            vision_floor: config.vision_floor,
            vision_ceiling: config.vision_ceiling,
            noise,
            events,
        })
    }

    /// One time step for one ACTIVE patient, drawing only from the
    /// patient's event/noise stream.
    pub fn advance(
        &self,
        state: &mut PatientState,
        input: &StepInput,
        rng: &mut ChaCha8Rng,
        counters: &mut DiagnosticCounters,
    ) -> Result<StepOutcome, AmdsimErr> {
        if !state.is_active() {
            return Err(InvariantErr::AdvanceAfterDiscontinuation {
                patient_id: state.patient_id,
            }
            .into());
        }

        let fortnights = snap_to_fortnights(input.elapsed_days, counters);
        let dt = fortnights as f64;
        let step_end = state.time_fortnights + fortnights;

        //----------------------------------------
        // Treatment effect under ceiling and resistance
        let mut benefit = 0.0;
        if input.treated {
            let ceiling = state.max_achievable_vision;
            if ceiling > 0.0 {
                let ceiling_factor = (1.0 - state.current_vision / ceiling).clamp(0.0, 1.0);
                let raw_benefit = self.base_effect_per_dose
                    * state.treatment_effect_multiplier()
                    * ceiling_factor;
                // Decay from doses before this one
                let resistance_factor =
                    (-state.resistance_rate() * state.treatments_received as f64).exp();
                benefit = raw_benefit * resistance_factor;
            } else {
                counters.ceiling_guard_zeroed += 1;
            }
            state.treatments_received += 1;
        }

        //----------------------------------------
        // Background decline, treated or not
        let decline = self.base_decline_per_fortnight * state.disease_progression_multiplier() * dt;

        //----------------------------------------
        // Measurement/biological noise
        let noise = match &self.noise {
            Some(sampler) => sampler.sample(rng),
            None => 0.0,
        };

        //----------------------------------------
        // Catastrophic events
        let months_elapsed = dt * FORTNIGHT_DAYS / DAYS_PER_MONTH;
        let mut catastrophic_impact = 0.0;
        let mut decision = StepDecision::Continue;
        for event in &self.events {
            // Permanent events are single-shot per patient
            if event.def.permanent && state.has_catastrophic_event(&event.def.name) {
                continue;
            }
            let mut probability = event.def.probability_per_month * months_elapsed;
            if probability <= 0.0 {
                continue;
            }
            if probability > 1.0 {
                probability = 1.0;
                counters.probability_clamped += 1;
            }
            if rng.gen_range(0.0..1.0) >= probability {
                continue;
            }

            let mut magnitude = event.impact.sample(rng);
            if magnitude < 0.0 {
                magnitude = 0.0;
                counters.impact_clamped += 1;
            }
            catastrophic_impact += magnitude;
            if event.def.permanent {
                state.max_achievable_vision -= event.def.ceiling_fraction * magnitude;
            }
            state.record_catastrophic_event(step_end, &event.def.name, magnitude);

            if let Some(threshold) = self.severity_threshold
                && magnitude >= threshold
            {
                decision = StepDecision::Discontinue(DiscontinuationReason::CatastrophicEvent {
                    event: event.def.name.clone(),
                });
            }
        }

        //----------------------------------------
        // Aggregate and clip
        let mut new_vision =
            state.current_vision + benefit - decline + noise - catastrophic_impact;
        if !new_vision.is_finite() {
            return Err(InvariantErr::NonFiniteVision {
                patient_id: state.patient_id,
                time_fortnights: step_end,
            }
            .into());
        }
        if new_vision < self.vision_floor {
            new_vision = self.vision_floor;
            counters.vision_clamped_low += 1;
        } else if new_vision > self.vision_ceiling {
            new_vision = self.vision_ceiling;
            counters.vision_clamped_high += 1;
        }

        state.current_vision = new_vision;
        state.time_fortnights = step_end;
        state.record_visit(input.treated);

        Ok(StepOutcome {
            vision: new_vision,
            benefit,
            decline,
            noise,
            catastrophic_impact,
            decision,
        })
    }
}
