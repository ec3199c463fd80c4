//----------------------------------------
// Compiled simulation model
//----------------------------------------
use crate::config::types::SimulationConfig;
use crate::error::AmdsimErr;
use crate::parameters::ParameterGenerator;
use crate::progression::DiseaseProgressionEngine;
use crate::trajectory::TrajectoryClassifier;

/// A validated configuration compiled into its working parts: classifier,
/// parameter generator, and progression engine. Shared read-only across all
/// patients in a run.
pub struct SimulationModel {
    pub classifier: TrajectoryClassifier,
    pub generator: ParameterGenerator,
    pub engine: DiseaseProgressionEngine,
}

impl SimulationModel {
    pub fn new(config: &SimulationConfig) -> Result<SimulationModel, AmdsimErr> {
        config.validate()?;
        Ok(SimulationModel {
            classifier: TrajectoryClassifier::new(&config.trajectory_classes)?,
            generator: ParameterGenerator::new(config)?,
            engine: DiseaseProgressionEngine::new(config)?,
        })
    }
}
