use super::{StepController, StepInput, ValidatedInput, unexpected_commit, unexpected_input};
use crate::gateway::ReasoningGateway;
use async_trait::async_trait;
use medcheck_core::session::{Condition, SessionState};
use medcheck_core::{CheckerError, Result, WizardStep};

/// Lets the user pick one candidate and loads its details.
pub struct ConditionSelectionStep;

impl ConditionSelectionStep {
    async fn load_details(
        &self,
        session: &mut SessionState,
        condition: Condition,
        gateway: &ReasoningGateway,
    ) -> Result<()> {
        let details = gateway.fetch_details(&condition.name).await?;
        session.attach_details(&condition.id, details)?;
        tracing::info!(
            session_id = session.id(),
            condition = %condition.name,
            "[ConditionSelectionStep] Details attached"
        );
        Ok(())
    }
}

#[async_trait]
impl StepController for ConditionSelectionStep {
    fn step(&self) -> WizardStep {
        WizardStep::ConditionSelection
    }

    fn can_enter(&self, session: &SessionState) -> bool {
        !session.conditions().is_empty()
    }

    fn entry_requirement(&self) -> &'static str {
        "at least one analysed condition"
    }

    fn validate(&self, session: &SessionState, input: StepInput) -> Result<ValidatedInput> {
        match input {
            StepInput::Select(identifier) => session
                .find_condition(&identifier)
                .cloned()
                .map(ValidatedInput::Selection)
                .ok_or_else(|| {
                    CheckerError::validation(format!(
                        "'{}' is not one of the analysed conditions",
                        identifier.trim()
                    ))
                }),
            StepInput::Continue if session.selected_condition().is_some() => {
                Ok(ValidatedInput::Proceed)
            }
            StepInput::Continue => Err(CheckerError::validation("Please select a condition")),
            other => Err(unexpected_input(self.step(), &other)),
        }
    }

    async fn commit(
        &self,
        session: &mut SessionState,
        input: ValidatedInput,
        gateway: &ReasoningGateway,
    ) -> Result<()> {
        match input {
            ValidatedInput::Selection(condition) => {
                session.select_condition(&condition)?;
                tracing::debug!(
                    session_id = session.id(),
                    condition = %condition.name,
                    "[ConditionSelectionStep] Condition selected"
                );
                self.load_details(session, condition, gateway).await
            }
            ValidatedInput::Proceed => {
                let Some(selected) = session.selected_condition() else {
                    return Err(CheckerError::validation("Please select a condition"));
                };
                if session.details().is_some() {
                    return Ok(());
                }
                let selected = selected.clone();
                self.load_details(session, selected, gateway).await
            }
            other => Err(unexpected_commit(self.step(), &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::session::{Condition, Probability};

    fn session_with_candidates() -> SessionState {
        let mut session = SessionState::new();
        session.replace_conditions(
            vec![
                Condition::new("1", "Flu", Probability::High, "Influenza"),
                Condition::new("2", "Cold", Probability::Medium, "Common cold"),
            ],
            "fever",
        );
        session
    }

    #[test]
    fn test_select_by_id_or_name() {
        let session = session_with_candidates();
        for identifier in ["2", "cold", " Cold "] {
            match ConditionSelectionStep
                .validate(&session, StepInput::Select(identifier.into()))
                .unwrap()
            {
                ValidatedInput::Selection(c) => assert_eq!(c.name, "Cold"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        let err = ConditionSelectionStep
            .validate(&session_with_candidates(), StepInput::Select("Measles".into()))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_continue_without_selection_is_rejected() {
        let mut session = session_with_candidates();
        let err = ConditionSelectionStep
            .validate(&session, StepInput::Continue)
            .unwrap_err();
        assert_eq!(err, CheckerError::validation("Please select a condition"));

        let flu = session.find_condition("Flu").cloned().unwrap();
        session.select_condition(&flu).unwrap();
        assert_eq!(
            ConditionSelectionStep
                .validate(&session, StepInput::Continue)
                .unwrap(),
            ValidatedInput::Proceed
        );
    }

    #[test]
    fn test_entry_requires_conditions() {
        assert!(!ConditionSelectionStep.can_enter(&SessionState::new()));
        assert!(ConditionSelectionStep.can_enter(&session_with_candidates()));
    }
}
