//! Step controllers, one per wizard step.
//!
//! Each controller owns the rules of its step: when it may be entered, how raw
//! input is validated, and what committing that input does to the session
//! (including any reasoning-service call). Controllers only mutate the
//! `SessionState` they are handed.

mod analysis;
mod condition_selection;
mod details_treatment;
mod intake;

pub use analysis::AnalysisStep;
pub use condition_selection::ConditionSelectionStep;
pub use details_treatment::DetailsAndTreatmentStep;
pub use intake::IntakeStep;

use crate::gateway::ReasoningGateway;
use async_trait::async_trait;
use medcheck_core::session::{Condition, PatientProfile, SessionState};
use medcheck_core::{CheckerError, Result, WizardStep};

/// Raw input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    /// Intake form fields, as typed.
    Intake { age: String, sex: String },
    /// Free-text symptoms, typed or dictated.
    Symptoms(String),
    /// A selection event; the identifier is a condition id or name.
    Select(String),
    /// Proceed with what the session already holds.
    Continue,
}

/// Input that passed a step's validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedInput {
    Patient(PatientProfile),
    Symptoms(String),
    Selection(Condition),
    Proceed,
}

#[async_trait]
pub trait StepController: Send + Sync {
    fn step(&self) -> WizardStep;

    /// Whether the session holds everything this step needs.
    fn can_enter(&self, session: &SessionState) -> bool;

    /// Human-readable form of the `can_enter` requirement.
    fn entry_requirement(&self) -> &'static str;

    /// Where the wizard goes when this step is current but not enterable.
    ///
    /// `None` means the nearest earlier enterable step.
    fn reroute(&self) -> Option<WizardStep> {
        None
    }

    /// Checks local input. Never mutates anything and never calls the service.
    fn validate(&self, session: &SessionState, input: StepInput) -> Result<ValidatedInput>;

    /// Applies validated input to the session, calling the service if needed.
    ///
    /// On failure the session keeps the user's entered input so the step can
    /// be retried.
    async fn commit(
        &self,
        session: &mut SessionState,
        input: ValidatedInput,
        gateway: &ReasoningGateway,
    ) -> Result<()>;
}

static INTAKE: IntakeStep = IntakeStep;
static ANALYSIS: AnalysisStep = AnalysisStep;
static CONDITION_SELECTION: ConditionSelectionStep = ConditionSelectionStep;
static DETAILS_AND_TREATMENT: DetailsAndTreatmentStep = DetailsAndTreatmentStep;

/// The controller for `step`; `None` for the terminal step.
pub fn controller_for(step: WizardStep) -> Option<&'static dyn StepController> {
    match step {
        WizardStep::Intake => Some(&INTAKE),
        WizardStep::Analysis => Some(&ANALYSIS),
        WizardStep::ConditionSelection => Some(&CONDITION_SELECTION),
        WizardStep::DetailsAndTreatment => Some(&DETAILS_AND_TREATMENT),
        WizardStep::Complete => None,
    }
}

fn unexpected_input(step: WizardStep, input: &StepInput) -> CheckerError {
    let kind = match input {
        StepInput::Intake { .. } => "intake details",
        StepInput::Symptoms(_) => "symptoms",
        StepInput::Select(_) => "a condition selection",
        StepInput::Continue => "continue",
    };
    CheckerError::validation(format!("The {step} step does not accept {kind}"))
}

fn unexpected_commit(step: WizardStep, input: &ValidatedInput) -> CheckerError {
    CheckerError::validation(format!("The {step} step cannot commit {input:?}"))
}
