//----------------------------------------
// patient mod
//----------------------------------------
pub mod types;

pub use types::{
    CatastrophicEventRecord, DiscontinuationReason, PatientCharacteristics, PatientState,
    PatientStatus, VisitRecord, VisitRow,
};
