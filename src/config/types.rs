//----------------------------------------
// config mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

use crate::distribution::types::DistributionSpec;

/// Full simulation configuration, deserialized by an external loader. The
/// core never reads files; it validates this structure eagerly and fails
/// fast rather than defaulting any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Global vision ceiling in ETDRS letters (85 in the source domain).
    pub vision_ceiling: f64,
    pub vision_floor: f64,
    pub trajectory_classes: Vec<TrajectoryClassSpec>,
    pub baseline_correlation: Option<BaselineCorrelationRule>,
    pub catastrophic_events: Vec<CatastrophicEventDefinition>,
    pub progression: ProgressionSettings,
    /// When set, parameter draws come from fixed pre-sampled pools indexed
    /// by patient id instead of per-patient streams.
    pub parameter_pool_size: Option<usize>,
}

/// A latent responder class with its population proportion and per-parameter
/// sampling distributions. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryClassSpec {
    pub name: String,
    pub proportion: f64,
    pub distributions: ClassDistributions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDistributions {
    pub treatment_effect_multiplier: DistributionSpec,
    pub disease_progression_multiplier: DistributionSpec,
    pub resistance_rate: DistributionSpec,
    /// Offset above baseline vision; the achievable ceiling is
    /// min(global ceiling, baseline + offset).
    pub max_vision_offset: DistributionSpec,
}

impl ClassDistributions {
    /// Fixed parameter order; also the draw order at enrollment.
    pub fn iter_named(&self) -> [(&'static str, &DistributionSpec); 4] {
        [
            ("treatment_effect_multiplier", &self.treatment_effect_multiplier),
            (
                "disease_progression_multiplier",
                &self.disease_progression_multiplier,
            ),
            ("resistance_rate", &self.resistance_rate),
            ("max_vision_offset", &self.max_vision_offset),
        ]
    }
}

/// Deterministic baseline-vision adjustment: patients above the threshold
/// respond better and progress slower. Applied exactly once per patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaselineCorrelationRule {
    pub baseline_threshold: f64,
    /// Multiplies the treatment-effect multiplier; must be >= 1.
    pub treatment_effect_factor: f64,
    /// Multiplies the progression multiplier; must be in (0, 1].
    pub progression_factor: f64,
}

/// A rare large vision loss (e.g. geographic atrophy). Impact magnitudes are
/// letters lost, drawn as positive values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatastrophicEventDefinition {
    pub name: String,
    pub probability_per_month: f64,
    pub impact: DistributionSpec,
    /// Permanent events fire at most once per patient and reduce the
    /// achievable ceiling; transient events may recur.
    pub permanent: bool,
    /// Fraction of the impact magnitude applied to the ceiling when the
    /// event is permanent.
    pub ceiling_fraction: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressionSettings {
    /// Letters gained per administered dose before multipliers and ceiling.
    pub base_effect_per_dose: f64,
    /// Letters lost per fortnight before multipliers.
    pub base_decline_per_fortnight: f64,
    /// Standard deviation of zero-mean per-visit noise; 0 disables it.
    pub measurement_noise_std: f64,
    /// Single-event magnitude at or above which the engine flags the
    /// patient for discontinuation.
    pub severity_discontinuation_threshold: Option<f64>,
}
