use statrs::statistics::Statistics;

use crate::config::error::ConfigErr;
use crate::error::AmdsimErr;
use crate::patient::types::PatientState;
use crate::progression::error::InvariantErr;
use crate::validation::error::ValidationDataErr;
use crate::validation::types::{
    StatisticResult, TargetStatistic, ValidationReport, ValidationSettings, ValidationTarget,
};

const CORRELATION_SLACK: f64 = 1e-8;

/// Compares a fully run population against published targets. Pure
/// read-only aggregation; no patient data is mutated.
pub fn evaluate_population(
    patients: &[PatientState],
    targets: &[ValidationTarget],
    settings: &ValidationSettings,
) -> Result<ValidationReport, AmdsimErr> {
    //----------------------------------------
    // Check arguments
    if settings.early_fortnight >= settings.endpoint_fortnight {
        return Err(ConfigErr::BadValidationWindow {
            early: settings.early_fortnight,
            endpoint: settings.endpoint_fortnight,
        }
        .into());
    }
    for target in targets {
        if !target.tolerance.is_finite() || target.tolerance < 0.0 {
            return Err(ConfigErr::BadTargetTolerance {
                name: target.name.clone(),
                tolerance: target.tolerance,
            }
            .into());
        }
    }

    let mut insufficient_population = false;
    if patients.len() < settings.min_population {
        if settings.fail_on_insufficient {
            return Err(ValidationDataErr::InsufficientPopulation {
                n_patients: patients.len(),
                min_required: settings.min_population,
            }
            .into());
        }
        log::warn!(
            "population ({}) below recommended minimum ({}); estimates may be unstable",
            patients.len(),
            settings.min_population
        );
        insufficient_population = true;
    }

    //----------------------------------------
    // Per-patient longitudinal changes (LOCF for discontinued patients)
    let mut early_changes: Vec<f64> = Vec::with_capacity(patients.len());
    let mut endpoint_changes: Vec<f64> = Vec::with_capacity(patients.len());
    let mut endpoint_visions: Vec<f64> = Vec::with_capacity(patients.len());
    for patient in patients {
        let early = patient.vision_at_fortnight(settings.early_fortnight);
        let endpoint = patient.vision_at_fortnight(settings.endpoint_fortnight);
        if let (Some(early), Some(endpoint)) = (early, endpoint) {
            early_changes.push(early - patient.baseline_vision);
            endpoint_changes.push(endpoint - patient.baseline_vision);
            endpoint_visions.push(endpoint);
        }
    }

    let mean_change = endpoint_changes.iter().mean();
    let sd_change = endpoint_changes.iter().std_dev();
    let correlation = pearson(&early_changes, &endpoint_changes)?;

    //----------------------------------------
    // Compare against targets
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let observed = match target.statistic {
            TargetStatistic::MeanChange => mean_change,
            TargetStatistic::SdChange => sd_change,
            TargetStatistic::EarlyEndpointCorrelation => correlation.unwrap_or(f64::NAN),
            TargetStatistic::ProportionAbove { threshold } => {
                proportion(&endpoint_visions, |v| *v > threshold)
            }
            TargetStatistic::ProportionBelow { threshold } => {
                proportion(&endpoint_visions, |v| *v < threshold)
            }
        };
        // NaN observed never passes
        let passed = (observed - target.expected).abs() <= target.tolerance;
        results.push(StatisticResult {
            name: target.name.clone(),
            expected: target.expected,
            observed,
            tolerance: target.tolerance,
            passed,
        });
    }

    let all_passed = results.iter().all(|r| r.passed);
    Ok(ValidationReport {
        population_size: patients.len(),
        insufficient_population,
        results,
        all_passed,
    })
}

/// Pearson correlation; `None` when undefined (fewer than two pairs or a
/// degenerate variance). A value outside [-1, 1] beyond rounding slack is a
/// logic bug, not a data problem.
fn pearson(xs: &[f64], ys: &[f64]) -> Result<Option<f64>, AmdsimErr> {
    if xs.len() < 2 {
        return Ok(None);
    }
    let sd_x = xs.iter().std_dev();
    let sd_y = ys.iter().std_dev();
    if !(sd_x > 0.0) || !(sd_y > 0.0) {
        return Ok(None);
    }
    let r = xs.iter().covariance(ys.iter()) / (sd_x * sd_y);
    if r.abs() > 1.0 + CORRELATION_SLACK {
        return Err(InvariantErr::CorrelationOutOfRange(r).into());
    }
    Ok(Some(r.clamp(-1.0, 1.0)))
}

fn proportion<F>(values: &[f64], predicate: F) -> f64
where
    F: Fn(&f64) -> bool,
{
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().filter(|v| predicate(v)).count() as f64 / values.len() as f64
}
