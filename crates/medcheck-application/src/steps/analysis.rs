use super::{StepController, StepInput, ValidatedInput, unexpected_commit, unexpected_input};
use crate::gateway::ReasoningGateway;
use async_trait::async_trait;
use medcheck_core::reasoning;
use medcheck_core::session::SessionState;
use medcheck_core::{CheckerError, Result, WizardStep};

/// Collects free-text symptoms and asks the reasoning service for candidates.
pub struct AnalysisStep;

#[async_trait]
impl StepController for AnalysisStep {
    fn step(&self) -> WizardStep {
        WizardStep::Analysis
    }

    fn can_enter(&self, session: &SessionState) -> bool {
        session.intake_committed()
    }

    fn entry_requirement(&self) -> &'static str {
        "a committed age and sex"
    }

    fn validate(&self, session: &SessionState, input: StepInput) -> Result<ValidatedInput> {
        let text = match &input {
            StepInput::Symptoms(text) => text.as_str(),
            StepInput::Continue => session.symptoms(),
            other => return Err(unexpected_input(self.step(), other)),
        };
        let symptoms = reasoning::require_symptoms(text)?;
        Ok(ValidatedInput::Symptoms(symptoms.to_string()))
    }

    async fn commit(
        &self,
        session: &mut SessionState,
        input: ValidatedInput,
        gateway: &ReasoningGateway,
    ) -> Result<()> {
        let ValidatedInput::Symptoms(symptoms) = input else {
            return Err(unexpected_commit(self.step(), &input));
        };
        let patient = *session
            .patient()
            .ok_or_else(|| CheckerError::step(self.step(), self.entry_requirement()))?;

        // Kept even if the call below fails, so the user can retry.
        session.set_symptoms(symptoms.clone());

        if session.analyzed_symptoms() == Some(symptoms.as_str()) && !session.conditions().is_empty() {
            tracing::debug!(
                session_id = session.id(),
                "[AnalysisStep] Symptoms unchanged; reusing {} conditions",
                session.conditions().len()
            );
            return Ok(());
        }

        let conditions = gateway.analyze(&patient, &symptoms).await?;
        tracing::info!(
            session_id = session.id(),
            count = conditions.len(),
            "[AnalysisStep] Analysis returned"
        );
        session.replace_conditions(conditions, symptoms);
        Ok(())
    }
}
