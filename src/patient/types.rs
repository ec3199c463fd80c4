//----------------------------------------
// patient mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

use crate::error::AmdsimErr;
use crate::progression::error::InvariantErr;

/// Per-patient stochastic parameters, assigned once at enrollment and
/// immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCharacteristics {
    pub class_index: usize,
    pub class_name: String,
    pub treatment_effect_multiplier: f64,
    pub disease_progression_multiplier: f64,
    pub resistance_rate: f64,
    /// Achievable ceiling at enrollment: min(global ceiling, baseline +
    /// sampled offset). The live ceiling sits on [`PatientState`] because
    /// permanent catastrophic events reduce it.
    pub max_achievable_vision: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiscontinuationReason {
    /// Decided by the external protocol layer.
    ProtocolDecision,
    CatastrophicEvent { event: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Discontinued {
        time_fortnights: u32,
        reason: DiscontinuationReason,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatastrophicEventRecord {
    pub time_fortnights: u32,
    pub event_type: String,
    /// Letters lost (positive).
    pub magnitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub time_fortnights: u32,
    pub vision: f64,
    pub treated: bool,
    pub treatments_received: u32,
}

/// One flattened per-step output row carrying full provenance, so
/// downstream analysis can reconstruct a patient without re-running the
/// simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRow {
    pub patient_id: u64,
    pub time_fortnights: u32,
    pub vision: f64,
    pub treated: bool,
    pub treatments_received: u32,
    pub trajectory_class: Option<String>,
    pub treatment_effect_multiplier: f64,
    pub disease_progression_multiplier: f64,
    pub resistance_rate: f64,
}

/// The mutable simulation record for one patient. Composition rather than a
/// class hierarchy: `characteristics` is absent for a homogeneous baseline
/// patient, and the update arithmetic falls back to unit multipliers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientState {
    pub patient_id: u64,
    pub baseline_vision: f64,
    pub current_vision: f64,
    /// Live ceiling; starts at the characteristic value (or the global
    /// ceiling for homogeneous patients) and is only ever reduced, by
    /// permanent catastrophic events.
    pub max_achievable_vision: f64,
    pub time_fortnights: u32,
    pub treatments_received: u32,
    pub characteristics: Option<PatientCharacteristics>,
    pub catastrophic_event_history: Vec<CatastrophicEventRecord>,
    pub visits: Vec<VisitRecord>,
    pub status: PatientStatus,
}

impl PatientState {
    pub fn new(
        patient_id: u64,
        baseline_vision: f64,
        characteristics: Option<PatientCharacteristics>,
        global_ceiling: f64,
    ) -> PatientState {
        let max_achievable_vision = characteristics
            .as_ref()
            .map(|c| c.max_achievable_vision)
            .unwrap_or(global_ceiling);
        PatientState {
            patient_id,
            baseline_vision,
            current_vision: baseline_vision,
            max_achievable_vision,
            time_fortnights: 0,
            treatments_received: 0,
            characteristics,
            catastrophic_event_history: vec![],
            // Enrollment snapshot, so vision lookups at time 0 resolve
            visits: vec![VisitRecord {
                time_fortnights: 0,
                vision: baseline_vision,
                treated: false,
                treatments_received: 0,
            }],
            status: PatientStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PatientStatus::Active
    }

    /// Terminal transition; calling it twice is a logic bug, not bad input.
    pub fn discontinue(
        &mut self,
        time_fortnights: u32,
        reason: DiscontinuationReason,
    ) -> Result<(), AmdsimErr> {
        if !self.is_active() {
            return Err(InvariantErr::AlreadyDiscontinued {
                patient_id: self.patient_id,
            }
            .into());
        }
        self.status = PatientStatus::Discontinued {
            time_fortnights,
            reason,
        };
        Ok(())
    }

    pub fn treatment_effect_multiplier(&self) -> f64 {
        self.characteristics
            .as_ref()
            .map(|c| c.treatment_effect_multiplier)
            .unwrap_or(1.0)
    }

    pub fn disease_progression_multiplier(&self) -> f64 {
        self.characteristics
            .as_ref()
            .map(|c| c.disease_progression_multiplier)
            .unwrap_or(1.0)
    }

    pub fn resistance_rate(&self) -> f64 {
        self.characteristics
            .as_ref()
            .map(|c| c.resistance_rate)
            .unwrap_or(0.0)
    }

    pub fn has_catastrophic_event(&self, event_type: &str) -> bool {
        self.catastrophic_event_history
            .iter()
            .any(|e| e.event_type == event_type)
    }

    pub fn record_catastrophic_event(&mut self, time_fortnights: u32, event_type: &str, magnitude: f64) {
        self.catastrophic_event_history.push(CatastrophicEventRecord {
            time_fortnights,
            event_type: String::from(event_type),
            magnitude,
        });
    }

    pub fn record_visit(&mut self, treated: bool) {
        self.visits.push(VisitRecord {
            time_fortnights: self.time_fortnights,
            vision: self.current_vision,
            treated,
            treatments_received: self.treatments_received,
        });
    }

    /// Vision at a fortnight, last observation carried forward. `None` only
    /// when the patient has no visit at or before the requested time.
    pub fn vision_at_fortnight(&self, time_fortnights: u32) -> Option<f64> {
        self.visits
            .iter()
            .rev()
            .find(|v| v.time_fortnights <= time_fortnights)
            .map(|v| v.vision)
    }

    /// Flattened per-step provenance rows for downstream export.
    pub fn visit_rows(&self) -> Vec<VisitRow> {
        self.visits
            .iter()
            .map(|v| VisitRow {
                patient_id: self.patient_id,
                time_fortnights: v.time_fortnights,
                vision: v.vision,
                treated: v.treated,
                treatments_received: v.treatments_received,
                trajectory_class: self
                    .characteristics
                    .as_ref()
                    .map(|c| c.class_name.clone()),
                treatment_effect_multiplier: self.treatment_effect_multiplier(),
                disease_progression_multiplier: self.disease_progression_multiplier(),
                resistance_rate: self.resistance_rate(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn characteristics() -> PatientCharacteristics {
        PatientCharacteristics {
            class_index: 1,
            class_name: String::from("moderate_responders"),
            treatment_effect_multiplier: 1.3,
            disease_progression_multiplier: 0.9,
            resistance_rate: 0.02,
            max_achievable_vision: 78.0,
        }
    }

    #[test]
    fn ceiling_comes_from_characteristics() {
        let state = PatientState::new(1, 60.0, Some(characteristics()), 85.0);
        assert_eq!(state.max_achievable_vision, 78.0);
    }

    #[test]
    fn homogeneous_patient_falls_back_to_unit_parameters() {
        let state = PatientState::new(2, 60.0, None, 85.0);
        assert_eq!(state.max_achievable_vision, 85.0);
        assert_eq!(state.treatment_effect_multiplier(), 1.0);
        assert_eq!(state.disease_progression_multiplier(), 1.0);
        assert_eq!(state.resistance_rate(), 0.0);
    }

    #[test]
    fn discontinue_is_terminal() {
        let mut state = PatientState::new(3, 60.0, None, 85.0);
        state
            .discontinue(10, DiscontinuationReason::ProtocolDecision)
            .expect("first discontinuation should succeed");
        assert!(!state.is_active());
        assert!(
            state
                .discontinue(11, DiscontinuationReason::ProtocolDecision)
                .is_err()
        );
    }

    #[test]
    fn vision_lookup_carries_last_observation_forward() {
        let mut state = PatientState::new(4, 60.0, None, 85.0);
        state.current_vision = 63.0;
        state.time_fortnights = 2;
        state.record_visit(true);
        state.current_vision = 61.5;
        state.time_fortnights = 5;
        state.record_visit(false);

        assert_eq!(state.vision_at_fortnight(0), Some(60.0));
        assert_eq!(state.vision_at_fortnight(2), Some(63.0));
        // Between visits: carried forward from fortnight 2
        assert_eq!(state.vision_at_fortnight(4), Some(63.0));
        assert_eq!(state.vision_at_fortnight(100), Some(61.5));
    }

    #[test]
    fn visit_rows_carry_provenance() {
        let state = PatientState::new(5, 55.0, Some(characteristics()), 85.0);
        let rows = state.visit_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].trajectory_class.as_deref(),
            Some("moderate_responders")
        );
        assert_eq!(rows[0].treatment_effect_multiplier, 1.3);
        assert_eq!(rows[0].patient_id, 5);
    }
}
