//----------------------------------------
// distribution errors
//----------------------------------------
use crate::error::AmdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistributionErr {
    #[error("normal standard deviation should be positive and finite; got {0}")]
    BadNormalStd(f64),
    #[error("lognormal scale should be positive and finite; got {0}")]
    BadLognormalScale(f64),
    #[error("beta shape parameters should be positive and finite; got alpha = {alpha}, beta = {beta}")]
    BadBetaShape { alpha: f64, beta: f64 },
    #[error("uniform bounds should be finite with min < max; got min = {min}, max = {max}")]
    BadUniformBounds { min: f64, max: f64 },
    #[error("distribution parameter should be finite; got {0}")]
    NonFiniteParameter(f64),
}

impl Into<AmdsimErr> for DistributionErr {
    fn into(self) -> AmdsimErr {
        AmdsimErr::Distribution(self)
    }
}
