//----------------------------------------
// validation mod
//----------------------------------------
pub mod engine;
pub mod error;
pub mod types;

pub use engine::evaluate_population;
pub use types::{
    StatisticResult, TargetStatistic, ValidationReport, ValidationSettings, ValidationTarget,
};
