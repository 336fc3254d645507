//! The single-session state accumulated across wizard steps.

use super::model::{Condition, ConditionDetails, PatientProfile, TreatmentInfo, with_unique_ids};
use super::snapshot::SessionSnapshot;
use crate::error::{CheckerError, Result};
use crate::step::WizardStep;
use uuid::Uuid;

/// State of one wizard run, from intake to completion.
///
/// Every step reads and writes this value; it is passed explicitly to each step
/// controller and never shared between runs. Mutators enforce the cross-step
/// invariants:
///
/// - every condition in `conditions` has an id no other candidate shares
/// - the selected condition is always an element of `conditions`
/// - `details` and `treatments` always belong to the selected condition, and are
///   cleared whenever the selection or the condition list changes
/// - the patient profile cannot change once committed
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    id: String,
    created_at: String,
    patient: Option<PatientProfile>,
    symptoms: String,
    /// Symptom text of the last successful analysis.
    analyzed_symptoms: Option<String>,
    conditions: Vec<Condition>,
    selected_condition: Option<Condition>,
    details: Option<ConditionDetails>,
    treatments: Option<TreatmentInfo>,
}

impl SessionState {
    /// Creates a fresh session with every optional field absent.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            patient: None,
            symptoms: String::new(),
            analyzed_symptoms: None,
            conditions: Vec::new(),
            selected_condition: None,
            details: None,
            treatments: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    // ============================================================================
    // Intake
    // ============================================================================

    pub fn patient(&self) -> Option<&PatientProfile> {
        self.patient.as_ref()
    }

    pub fn intake_committed(&self) -> bool {
        self.patient.is_some()
    }

    /// Records the patient profile.
    ///
    /// Committing the same profile again is a no-op; a different profile is
    /// rejected because intake values are immutable once committed.
    pub fn commit_patient(&mut self, profile: PatientProfile) -> Result<()> {
        match self.patient {
            Some(existing) if existing != profile => Err(CheckerError::step(
                WizardStep::Intake,
                format!(
                    "intake already committed (age {}, sex {}); start a new session to change it",
                    existing.age, existing.sex
                ),
            )),
            _ => {
                self.patient = Some(profile);
                Ok(())
            }
        }
    }

    // ============================================================================
    // Analysis
    // ============================================================================

    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    pub fn set_symptoms(&mut self, symptoms: impl Into<String>) {
        self.symptoms = symptoms.into();
    }

    pub fn analyzed_symptoms(&self) -> Option<&str> {
        self.analyzed_symptoms.as_deref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Replaces the candidate conditions wholesale with a fresh analysis result.
    ///
    /// Repeated or missing ids are made unique. Any selection, details and
    /// treatments from a previous analysis are cleared.
    pub fn replace_conditions(&mut self, conditions: Vec<Condition>, analyzed_for: impl Into<String>) {
        self.conditions = with_unique_ids(conditions);
        self.analyzed_symptoms = Some(analyzed_for.into());
        self.selected_condition = None;
        self.details = None;
        self.treatments = None;
    }

    /// Looks up a candidate condition by id, then by name.
    pub fn find_condition(&self, identifier: &str) -> Option<&Condition> {
        let identifier = identifier.trim();
        self.conditions
            .iter()
            .find(|c| c.id == identifier)
            .or_else(|| self.conditions.iter().find(|c| c.matches(identifier)))
    }

    // ============================================================================
    // Condition selection
    // ============================================================================

    pub fn selected_condition(&self) -> Option<&Condition> {
        self.selected_condition.as_ref()
    }

    /// Selects one of the candidate conditions.
    ///
    /// Every selection clears `details` and `treatments`, including re-selection of
    /// the current condition.
    pub fn select_condition(&mut self, condition: &Condition) -> Result<()> {
        if !self.conditions.contains(condition) {
            return Err(CheckerError::validation(format!(
                "'{}' is not one of the analysed conditions",
                condition.name
            )));
        }
        self.selected_condition = Some(condition.clone());
        self.details = None;
        self.treatments = None;
        Ok(())
    }

    pub fn details(&self) -> Option<&ConditionDetails> {
        self.details.as_ref()
    }

    /// Stores details fetched for the condition with `condition_id`.
    ///
    /// Rejected when that condition is no longer the selected one.
    pub fn attach_details(&mut self, condition_id: &str, details: ConditionDetails) -> Result<()> {
        self.ensure_selected(WizardStep::ConditionSelection, condition_id)?;
        self.details = Some(details);
        Ok(())
    }

    // ============================================================================
    // Details and treatment
    // ============================================================================

    pub fn treatments(&self) -> Option<&TreatmentInfo> {
        self.treatments.as_ref()
    }

    /// Stores treatments fetched for the condition with `condition_id`.
    ///
    /// Rejected when that condition is no longer the selected one.
    pub fn attach_treatments(&mut self, condition_id: &str, treatments: TreatmentInfo) -> Result<()> {
        self.ensure_selected(WizardStep::DetailsAndTreatment, condition_id)?;
        self.treatments = Some(treatments);
        Ok(())
    }

    fn ensure_selected(&self, step: WizardStep, condition_id: &str) -> Result<()> {
        match &self.selected_condition {
            Some(selected) if selected.id == condition_id => Ok(()),
            Some(selected) => Err(CheckerError::step(
                step,
                format!(
                    "result for condition '{}' is stale; '{}' ({}) is selected",
                    condition_id, selected.name, selected.id
                ),
            )),
            None => Err(CheckerError::step(step, "no condition is selected")),
        }
    }

    /// Produces the read-only record handed to the session recorder.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            created_at: self.created_at.clone(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            age: self.patient.map(|p| p.age),
            sex: self.patient.map(|p| p.sex),
            symptoms: self.symptoms.clone(),
            conditions: self.conditions.clone(),
            selected_condition: self.selected_condition.clone(),
            details: self.details.clone(),
            treatments: self.treatments.clone(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::{Probability, Sex};
    use serde_json::json;

    fn analysed_session() -> SessionState {
        let mut session = SessionState::new();
        session
            .commit_patient(PatientProfile {
                age: 34,
                sex: Sex::Female,
            })
            .unwrap();
        session.set_symptoms("fever and cough for 3 days");
        session.replace_conditions(
            vec![
                Condition::new("1", "Flu", Probability::High, "Influenza"),
                Condition::new("2", "Cold", Probability::Medium, "Common cold"),
            ],
            "fever and cough for 3 days",
        );
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionState::new();
        assert!(!session.id().is_empty());
        assert!(session.patient().is_none());
        assert!(session.conditions().is_empty());
        assert!(session.selected_condition().is_none());
        assert!(session.details().is_none());
        assert!(session.treatments().is_none());
    }

    #[test]
    fn test_patient_is_immutable_once_committed() {
        let mut session = analysed_session();
        let same = PatientProfile {
            age: 34,
            sex: Sex::Female,
        };
        assert!(session.commit_patient(same).is_ok());

        let err = session
            .commit_patient(PatientProfile {
                age: 35,
                sex: Sex::Female,
            })
            .unwrap_err();
        assert!(err.is_step());
        assert_eq!(session.patient().unwrap().age, 34);
    }

    #[test]
    fn test_select_rejects_foreign_condition() {
        let mut session = analysed_session();
        let foreign = Condition::new("9", "Measles", Probability::Low, "");
        let err = session.select_condition(&foreign).unwrap_err();
        assert!(err.is_validation());
        assert!(session.selected_condition().is_none());
    }

    #[test]
    fn test_changing_selection_clears_details_and_treatments() {
        let mut session = analysed_session();
        let flu = session.find_condition("Flu").cloned().unwrap();
        let cold = session.find_condition("2").cloned().unwrap();

        session.select_condition(&flu).unwrap();
        session.attach_details("1", ConditionDetails::default()).unwrap();
        session
            .attach_treatments("1", TreatmentInfo::new(json!({"medications": []})))
            .unwrap();

        session.select_condition(&cold).unwrap();
        assert_eq!(session.selected_condition(), Some(&cold));
        assert!(session.details().is_none());
        assert!(session.treatments().is_none());
    }

    #[test]
    fn test_stale_details_are_refused() {
        let mut session = analysed_session();
        let cold = session.find_condition("Cold").cloned().unwrap();
        session.select_condition(&cold).unwrap();

        let err = session
            .attach_details("1", ConditionDetails::default())
            .unwrap_err();
        assert!(err.is_step());
        assert!(session.details().is_none());
    }

    #[test]
    fn test_same_named_candidates_stay_distinct() {
        let mut session = SessionState::new();
        session.replace_conditions(
            vec![
                Condition::new("1", "Flu", Probability::High, "seasonal"),
                Condition::new("1", "Flu", Probability::Low, "avian"),
            ],
            "fever",
        );
        assert_eq!(session.conditions()[1].id, "1-2");

        let avian = session.find_condition("1-2").cloned().unwrap();
        assert_eq!(avian.description, "avian");
        session.select_condition(&avian).unwrap();

        let err = session
            .attach_details("1", ConditionDetails::default())
            .unwrap_err();
        assert!(err.is_step());
        assert!(session.details().is_none());

        session.attach_details("1-2", ConditionDetails::default()).unwrap();
        assert!(session.details().is_some());
    }

    #[test]
    fn test_repeated_ids_resolve_to_distinct_conditions() {
        let mut session = SessionState::new();
        session.replace_conditions(
            vec![
                Condition::new("1", "Flu", Probability::High, ""),
                Condition::new("1", "Cold", Probability::Medium, ""),
            ],
            "cough",
        );

        let second = session.conditions()[1].clone();
        assert_eq!(session.find_condition(&second.id), Some(&second));
        assert_eq!(session.find_condition(&second.id).unwrap().name, "Cold");
        assert_eq!(session.find_condition("1").unwrap().name, "Flu");
    }

    #[test]
    fn test_replace_conditions_clears_downstream() {
        let mut session = analysed_session();
        let flu = session.find_condition("Flu").cloned().unwrap();
        session.select_condition(&flu).unwrap();
        session.attach_details("1", ConditionDetails::default()).unwrap();

        session.replace_conditions(
            vec![Condition::new("3", "Migraine", Probability::High, "")],
            "headache",
        );
        assert_eq!(session.conditions().len(), 1);
        assert_eq!(session.analyzed_symptoms(), Some("headache"));
        assert!(session.selected_condition().is_none());
        assert!(session.details().is_none());
    }

    #[test]
    fn test_snapshot_carries_everything() {
        let mut session = analysed_session();
        let flu = session.find_condition("Flu").cloned().unwrap();
        session.select_condition(&flu).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.id());
        assert_eq!(snapshot.age, Some(34));
        assert_eq!(snapshot.sex, Some(Sex::Female));
        assert_eq!(snapshot.conditions.len(), 2);
        assert_eq!(snapshot.selected_condition.unwrap().name, "Flu");
    }
}
