//----------------------------------------
// validation mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

/// The population statistic a target constrains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statistic", rename_all = "snake_case")]
pub enum TargetStatistic {
    /// Mean vision change from baseline to the endpoint.
    MeanChange,
    /// Standard deviation of the endpoint change.
    SdChange,
    /// Pearson correlation between early-timepoint and endpoint change.
    EarlyEndpointCorrelation,
    /// Fraction of patients with endpoint vision strictly above the threshold.
    ProportionAbove { threshold: f64 },
    /// Fraction of patients with endpoint vision strictly below the threshold.
    ProportionBelow { threshold: f64 },
}

/// A published statistic the simulated population is compared against
/// (e.g. the Seven-UP seven-year outcomes), with its tolerance band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationTarget {
    pub name: String,
    pub statistic: TargetStatistic,
    pub expected: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub endpoint_fortnight: u32,
    pub early_fortnight: u32,
    /// Populations below this are statistically unstable; the source
    /// material recommends at least 1000.
    pub min_population: usize,
    /// Hard-fail on small populations instead of warning.
    pub fail_on_insufficient: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticResult {
    pub name: String,
    pub expected: f64,
    pub observed: f64,
    pub tolerance: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub population_size: usize,
    pub insufficient_population: bool,
    pub results: Vec<StatisticResult>,
    pub all_passed: bool,
}
