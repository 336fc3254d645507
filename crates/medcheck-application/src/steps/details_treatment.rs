use super::{StepController, StepInput, ValidatedInput, unexpected_commit, unexpected_input};
use crate::gateway::ReasoningGateway;
use async_trait::async_trait;
use medcheck_core::session::SessionState;
use medcheck_core::{CheckerError, Result, WizardStep};

/// Shows details for the selected condition and loads its treatments.
pub struct DetailsAndTreatmentStep;

#[async_trait]
impl StepController for DetailsAndTreatmentStep {
    fn step(&self) -> WizardStep {
        WizardStep::DetailsAndTreatment
    }

    fn can_enter(&self, session: &SessionState) -> bool {
        session.selected_condition().is_some() && session.details().is_some()
    }

    fn entry_requirement(&self) -> &'static str {
        "a selected condition with its details"
    }

    fn reroute(&self) -> Option<WizardStep> {
        Some(WizardStep::ConditionSelection)
    }

    fn validate(&self, _session: &SessionState, input: StepInput) -> Result<ValidatedInput> {
        match input {
            StepInput::Continue => Ok(ValidatedInput::Proceed),
            other => Err(unexpected_input(self.step(), &other)),
        }
    }

    async fn commit(
        &self,
        session: &mut SessionState,
        input: ValidatedInput,
        gateway: &ReasoningGateway,
    ) -> Result<()> {
        if input != ValidatedInput::Proceed {
            return Err(unexpected_commit(self.step(), &input));
        }
        if session.treatments().is_some() {
            return Ok(());
        }
        let selected = session
            .selected_condition()
            .cloned()
            .ok_or_else(|| CheckerError::step(self.step(), "no condition is selected"))?;

        let treatments = gateway.fetch_treatments(&selected.name).await?;
        session.attach_treatments(&selected.id, treatments)?;
        tracing::info!(
            session_id = session.id(),
            condition = %selected.name,
            "[DetailsAndTreatmentStep] Treatments attached"
        );
        Ok(())
    }
}
