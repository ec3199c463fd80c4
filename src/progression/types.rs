//----------------------------------------
// progression mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

use crate::patient::types::DiscontinuationReason;

/// All visit intervals in the source domain are multiples of 14 days, so
/// the engine discretizes time in fortnights.
pub const FORTNIGHT_DAYS: f64 = 14.0;
/// Mean Gregorian month, used to scale per-month hazards to the grid.
pub const DAYS_PER_MONTH: f64 = 30.4375;

#[derive(Debug, Clone, Copy)]
pub struct StepInput {
    /// Whether the external protocol administered a dose this step.
    pub treated: bool,
    /// Real elapsed time; snapped to whole fortnights.
    pub elapsed_days: f64,
}

impl StepInput {
    pub fn fortnight(treated: bool) -> StepInput {
        StepInput {
            treated,
            elapsed_days: FORTNIGHT_DAYS,
        }
    }
}

/// What the engine decided about the patient's lifecycle this step. The
/// engine never applies discontinuation policy itself; it reports the
/// transition for the caller to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum StepDecision {
    Continue,
    Discontinue(DiscontinuationReason),
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub vision: f64,
    pub benefit: f64,
    pub decline: f64,
    pub noise: f64,
    pub catastrophic_impact: f64,
    pub decision: StepDecision,
}

/// Counts of defensive clamps taken during a run. Guard conditions are
/// handled locally rather than raised, but kept countable for post-hoc
/// review.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiagnosticCounters {
    pub multiplier_clamped: u64,
    pub resistance_clamped: u64,
    pub ceiling_guard_zeroed: u64,
    pub probability_clamped: u64,
    pub impact_clamped: u64,
    pub vision_clamped_low: u64,
    pub vision_clamped_high: u64,
    pub negative_elapsed_clamped: u64,
}

impl DiagnosticCounters {
    pub fn any(&self) -> bool {
        self.multiplier_clamped
            + self.resistance_clamped
            + self.ceiling_guard_zeroed
            + self.probability_clamped
            + self.impact_clamped
            + self.vision_clamped_low
            + self.vision_clamped_high
            + self.negative_elapsed_clamped
            > 0
    }
}

/// Snaps elapsed real time to the fortnight grid (round to nearest).
/// Negative elapsed time is a guard condition, clamped to zero and counted.
pub fn snap_to_fortnights(elapsed_days: f64, counters: &mut DiagnosticCounters) -> u32 {
    if elapsed_days < 0.0 || !elapsed_days.is_finite() {
        counters.negative_elapsed_clamped += 1;
        return 0;
    }
    (elapsed_days / FORTNIGHT_DAYS).round() as u32
}
