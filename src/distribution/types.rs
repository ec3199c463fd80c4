//----------------------------------------
// distribution mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

/// A distribution specification as it arrives from configuration. Validated
/// eagerly when compiled into a [`Sampler`](crate::distribution::Sampler),
/// before any patient is simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSpec {
    Normal { mean: f64, std: f64 },
    /// Location/scale are the mean/std of the underlying normal.
    Lognormal { location: f64, scale: f64 },
    Beta { alpha: f64, beta: f64 },
    Uniform { min: f64, max: f64 },
    /// Degenerate draw. Used for parameters that are fixed rather than
    /// sampled (e.g. zero resistance); statrs rejects `uniform {x, x}`.
    Constant { value: f64 },
}
