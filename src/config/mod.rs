//----------------------------------------
// config mod
//----------------------------------------
pub mod error;
pub mod types;
mod validate;

pub use types::{
    BaselineCorrelationRule, CatastrophicEventDefinition, ClassDistributions, ProgressionSettings,
    SimulationConfig, TrajectoryClassSpec,
};
