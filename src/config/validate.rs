use crate::config::error::ConfigErr;
use crate::config::types::SimulationConfig;
use crate::distribution::Sampler;
use crate::error::AmdsimErr;
use crate::trajectory::classifier::TrajectoryClassifier;

impl SimulationConfig {
    /// Checks the whole configuration before any patient exists. Every
    /// problem is an error; nothing is defaulted or silently repaired.
    pub fn validate(&self) -> Result<(), AmdsimErr> {
        //----------------------------------------
        // Vision bounds
        if !self.vision_floor.is_finite()
            || !self.vision_ceiling.is_finite()
            || self.vision_floor >= self.vision_ceiling
        {
            return Err(ConfigErr::BadVisionBounds {
                floor: self.vision_floor,
                ceiling: self.vision_ceiling,
            }
            .into());
        }

        //----------------------------------------
        // Trajectory classes: proportions + distributions
        TrajectoryClassifier::new(&self.trajectory_classes)?;
        for class in &self.trajectory_classes {
            for (parameter, spec) in class.distributions.iter_named() {
                Sampler::new(spec).map_err(|e| wrap_distribution_err(e, &class.name, parameter))?;
            }
        }

        //----------------------------------------
        // Baseline correlation rule
        if let Some(rule) = &self.baseline_correlation {
            let factors_valid = rule.treatment_effect_factor.is_finite()
                && rule.progression_factor.is_finite()
                && rule.treatment_effect_factor >= 1.0
                && rule.progression_factor > 0.0
                && rule.progression_factor <= 1.0;
            if !factors_valid {
                return Err(ConfigErr::BadCorrelationFactors {
                    treatment_effect_factor: rule.treatment_effect_factor,
                    progression_factor: rule.progression_factor,
                }
                .into());
            }
        }

        //----------------------------------------
        // Catastrophic events
        for event in &self.catastrophic_events {
            if !event.probability_per_month.is_finite()
                || !(0.0..=1.0).contains(&event.probability_per_month)
            {
                return Err(ConfigErr::BadEventProbability {
                    event: event.name.clone(),
                    probability: event.probability_per_month,
                }
                .into());
            }
            if !event.ceiling_fraction.is_finite() || !(0.0..=1.0).contains(&event.ceiling_fraction)
            {
                return Err(ConfigErr::BadCeilingFraction {
                    event: event.name.clone(),
                    fraction: event.ceiling_fraction,
                }
                .into());
            }
            Sampler::new(&event.impact)
                .map_err(|e| wrap_distribution_err(e, &event.name, "impact"))?;
        }

        //----------------------------------------
        // Progression settings
        let p = &self.progression;
        if !p.measurement_noise_std.is_finite() || p.measurement_noise_std < 0.0 {
            return Err(ConfigErr::BadNoiseStd(p.measurement_noise_std).into());
        }
        if !p.base_effect_per_dose.is_finite() || p.base_effect_per_dose < 0.0 {
            return Err(ConfigErr::BadProgressionRate {
                name: "base_effect_per_dose",
                value: p.base_effect_per_dose,
            }
            .into());
        }
        if !p.base_decline_per_fortnight.is_finite() || p.base_decline_per_fortnight < 0.0 {
            return Err(ConfigErr::BadProgressionRate {
                name: "base_decline_per_fortnight",
                value: p.base_decline_per_fortnight,
            }
            .into());
        }
        if let Some(threshold) = p.severity_discontinuation_threshold
            && !(threshold.is_finite() && threshold > 0.0)
        {
            return Err(ConfigErr::BadSeverityThreshold(threshold).into());
        }

        if self.parameter_pool_size == Some(0) {
            return Err(ConfigErr::BadPoolSize.into());
        }

        Ok(())
    }
}

fn wrap_distribution_err(err: AmdsimErr, owner: &str, parameter: &str) -> AmdsimErr {
    match err {
        AmdsimErr::Distribution(source) => ConfigErr::BadDistribution {
            context: format!("{owner} / {parameter}"),
            source,
        }
        .into(),
        other => other,
    }
}
