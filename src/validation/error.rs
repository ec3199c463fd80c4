//----------------------------------------
// validation errors
//----------------------------------------
use crate::error::AmdsimErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationDataErr {
    #[error(
        "population ({n_patients}) is smaller than required for stable estimates ({min_required})"
    )]
    InsufficientPopulation {
        n_patients: usize,
        min_required: usize,
    },
}

impl Into<AmdsimErr> for ValidationDataErr {
    fn into(self) -> AmdsimErr {
        AmdsimErr::ValidationData(self)
    }
}
