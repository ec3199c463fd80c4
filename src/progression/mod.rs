//----------------------------------------
// progression mod
//----------------------------------------
pub mod engine;
pub mod error;
pub mod types;

pub use engine::DiseaseProgressionEngine;
pub use types::{DiagnosticCounters, StepDecision, StepInput, StepOutcome};
