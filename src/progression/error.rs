//----------------------------------------
// progression errors
//----------------------------------------
use crate::error::AmdsimErr;
use thiserror::Error;

/// Mid-run invariant violations. These indicate a logic bug rather than bad
/// input; they are fatal and never retried.
#[derive(Error, Debug)]
pub enum InvariantErr {
    #[error("patient {patient_id} was discontinued twice")]
    AlreadyDiscontinued { patient_id: u64 },
    #[error("patient {patient_id} advanced after discontinuation")]
    AdvanceAfterDiscontinuation { patient_id: u64 },
    #[error("patient {patient_id} vision became non-finite at fortnight {time_fortnights}")]
    NonFiniteVision {
        patient_id: u64,
        time_fortnights: u32,
    },
    #[error("trajectory class index {index} out of range")]
    UnknownTrajectoryClass { index: usize },
    #[error("computed correlation should be in [-1, 1]; got {0}")]
    CorrelationOutOfRange(f64),
}

impl Into<AmdsimErr> for InvariantErr {
    fn into(self) -> AmdsimErr {
        AmdsimErr::Invariant(self)
    }
}
