//----------------------------------------
// config errors
//----------------------------------------
use crate::distribution::error::DistributionErr;
use crate::error::AmdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigErr {
    #[error("at least one trajectory class must be configured")]
    NoTrajectoryClasses,
    #[error("trajectory class proportions should sum to 1.0 within 1e-6; got {0}")]
    BadProportionSum(f64),
    #[error("trajectory class '{class}' proportion should be positive; got {proportion}")]
    NonPositiveProportion { class: String, proportion: f64 },
    #[error("distribution for {context} is invalid: {source}")]
    BadDistribution {
        context: String,
        source: DistributionErr,
    },
    #[error(
        "catastrophic event '{event}' probability per month should be in [0, 1]; got {probability}"
    )]
    BadEventProbability { event: String, probability: f64 },
    #[error("catastrophic event '{event}' ceiling fraction should be in [0, 1]; got {fraction}")]
    BadCeilingFraction { event: String, fraction: f64 },
    #[error("measurement noise standard deviation should be non-negative and finite; got {0}")]
    BadNoiseStd(f64),
    #[error("progression rate '{name}' should be non-negative and finite; got {value}")]
    BadProgressionRate { name: &'static str, value: f64 },
    #[error("vision floor should be below the ceiling; got floor = {floor}, ceiling = {ceiling}")]
    BadVisionBounds { floor: f64, ceiling: f64 },
    #[error(
        "baseline correlation factors should satisfy treatment_effect_factor >= 1 and \
        0 < progression_factor <= 1; got {treatment_effect_factor} and {progression_factor}"
    )]
    BadCorrelationFactors {
        treatment_effect_factor: f64,
        progression_factor: f64,
    },
    #[error("severity discontinuation threshold should be positive; got {0}")]
    BadSeverityThreshold(f64),
    #[error("parameter pool size should be positive when set")]
    BadPoolSize,
    #[error("validation target '{name}' tolerance should be non-negative and finite; got {tolerance}")]
    BadTargetTolerance { name: String, tolerance: f64 },
    #[error(
        "early validation timepoint should fall before the endpoint; got {early} and {endpoint}"
    )]
    BadValidationWindow { early: u32, endpoint: u32 },
    #[error("patient id {0} enrolled more than once")]
    DuplicatePatientId(u64),
}

impl Into<AmdsimErr> for ConfigErr {
    fn into(self) -> AmdsimErr {
        AmdsimErr::Config(self)
    }
}
