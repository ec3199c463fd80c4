//----------------------------------------
// Crate error type
//----------------------------------------
use crate::config::error::ConfigErr;
use crate::distribution::error::DistributionErr;
use crate::progression::error::InvariantErr;
use crate::validation::error::ValidationDataErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmdsimErr {
    #[error("while validating simulation configuration: {0}")]
    Config(ConfigErr),
    #[error("while building sampling distribution: {0}")]
    Distribution(DistributionErr),
    #[error("simulation invariant violated: {0}")]
    Invariant(InvariantErr),
    #[error("while computing population statistics: {0}")]
    ValidationData(ValidationDataErr),
}
