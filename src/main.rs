use std::time::Instant;

use amdsim::cohort_sim::{Enrollment, run_cohort_sim};
use amdsim::config::{
    BaselineCorrelationRule, CatastrophicEventDefinition, ClassDistributions, ProgressionSettings,
    SimulationConfig, TrajectoryClassSpec,
};
use amdsim::distribution::DistributionSpec;
use amdsim::patient::PatientState;
use amdsim::validation::{
    TargetStatistic, ValidationSettings, ValidationTarget, evaluate_population,
};

fn demo_config() -> SimulationConfig {
    let class = |name: &str, proportion: f64, effect_location: f64, decline_location: f64| {
        TrajectoryClassSpec {
            name: String::from(name),
            proportion,
            distributions: ClassDistributions {
                treatment_effect_multiplier: DistributionSpec::Lognormal {
                    location: effect_location,
                    scale: 0.25,
                },
                disease_progression_multiplier: DistributionSpec::Lognormal {
                    location: decline_location,
                    scale: 0.3,
                },
                resistance_rate: DistributionSpec::Beta {
                    alpha: 2.0,
                    beta: 30.0,
                },
                max_vision_offset: DistributionSpec::Normal {
                    mean: 12.0,
                    std: 5.0,
                },
            },
        }
    };
    SimulationConfig {
        seed: 24601,
        vision_ceiling: 85.0,
        vision_floor: 0.0,
        trajectory_classes: vec![
            class("good_responders", 0.25, 0.25, -0.4),
            class("moderate_responders", 0.40, 0.0, 0.0),
            class("poor_responders", 0.35, -0.35, 0.35),
        ],
        baseline_correlation: Some(BaselineCorrelationRule {
            baseline_threshold: 70.0,
            treatment_effect_factor: 1.15,
            progression_factor: 0.85,
        }),
        catastrophic_events: vec![CatastrophicEventDefinition {
            name: String::from("geographic_atrophy"),
            probability_per_month: 0.0025,
            impact: DistributionSpec::Lognormal {
                location: 2.7,
                scale: 0.4,
            },
            permanent: true,
            ceiling_fraction: 1.0,
        }],
        progression: ProgressionSettings {
            base_effect_per_dose: 5.0,
            base_decline_per_fortnight: 0.12,
            measurement_noise_std: 1.5,
            severity_discontinuation_threshold: Some(30.0),
        },
        parameter_pool_size: None,
    }
}

fn main() {
    env_logger::init();

    let config = demo_config();
    let enrollments: Vec<Enrollment> = (0..2000)
        .map(|patient_id| Enrollment {
            patient_id,
            baseline_vision: 40.0 + (patient_id % 36) as f64,
        })
        .collect();

    // Fixed 8-weekly dosing; protocol logic proper lives outside the core
    let eight_weekly = |_state: &PatientState, step: usize| step % 4 == 0;

    let start = Instant::now();
    let result = run_cohort_sim(
        &config,       // config
        &enrollments,  // enrollments
        182,           // n_steps (7 years of fortnights)
        eight_weekly,  // schedule
    )
    .expect("cohort simulation failed");
    println!("2000 patients x 182 fortnights: {:?}", start.elapsed());

    let discontinued = result.patients.iter().filter(|p| !p.is_active()).count();
    println!("discontinued: {discontinued}");
    println!("guard counters: {:?}", result.counters);

    let targets = vec![
        ValidationTarget {
            name: String::from("mean_change_7y"),
            statistic: TargetStatistic::MeanChange,
            expected: -8.6,
            tolerance: 5.0,
        },
        ValidationTarget {
            name: String::from("sd_change_7y"),
            statistic: TargetStatistic::SdChange,
            expected: 30.0,
            tolerance: 20.0,
        },
        ValidationTarget {
            name: String::from("proportion_above_70"),
            statistic: TargetStatistic::ProportionAbove { threshold: 70.0 },
            expected: 0.2,
            tolerance: 0.15,
        },
    ];
    let report = evaluate_population(
        &result.patients,
        &targets,
        &ValidationSettings {
            endpoint_fortnight: 182,
            early_fortnight: 52,
            min_population: 1000,
            fail_on_insufficient: false,
        },
    )
    .expect("validation failed");
    println!("validation report: {:#?}", report);
}
