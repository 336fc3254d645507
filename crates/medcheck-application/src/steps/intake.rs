use super::{StepController, StepInput, ValidatedInput, unexpected_commit, unexpected_input};
use crate::gateway::ReasoningGateway;
use async_trait::async_trait;
use medcheck_core::session::{PatientProfile, SessionState, Sex};
use medcheck_core::{CheckerError, Result, WizardStep};
use std::str::FromStr;

/// Entry step: collects age and sex. Makes no service call.
pub struct IntakeStep;

impl IntakeStep {
    fn parse_age(raw: &str) -> Result<u32> {
        match raw.trim().parse::<u32>() {
            Ok(age) if age > 0 => Ok(age),
            _ => Err(CheckerError::validation(format!(
                "Age must be a positive whole number, got '{}'",
                raw.trim()
            ))),
        }
    }

    fn parse_sex(raw: &str) -> Result<Sex> {
        Sex::from_str(raw.trim()).map_err(|_| {
            CheckerError::validation(format!(
                "Sex must be one of male, female or other, got '{}'",
                raw.trim()
            ))
        })
    }
}

#[async_trait]
impl StepController for IntakeStep {
    fn step(&self) -> WizardStep {
        WizardStep::Intake
    }

    fn can_enter(&self, _session: &SessionState) -> bool {
        true
    }

    fn entry_requirement(&self) -> &'static str {
        "nothing"
    }

    fn validate(&self, session: &SessionState, input: StepInput) -> Result<ValidatedInput> {
        match input {
            StepInput::Intake { age, sex } => Ok(ValidatedInput::Patient(PatientProfile {
                age: Self::parse_age(&age)?,
                sex: Self::parse_sex(&sex)?,
            })),
            StepInput::Continue if session.intake_committed() => Ok(ValidatedInput::Proceed),
            StepInput::Continue => Err(CheckerError::validation("Please enter your age and sex")),
            other => Err(unexpected_input(self.step(), &other)),
        }
    }

    async fn commit(
        &self,
        session: &mut SessionState,
        input: ValidatedInput,
        _gateway: &ReasoningGateway,
    ) -> Result<()> {
        match input {
            ValidatedInput::Patient(profile) => {
                session.commit_patient(profile)?;
                tracing::info!(
                    session_id = session.id(),
                    age = profile.age,
                    sex = %profile.sex,
                    "[IntakeStep] Intake committed"
                );
                Ok(())
            }
            ValidatedInput::Proceed if session.intake_committed() => Ok(()),
            ValidatedInput::Proceed => Err(CheckerError::validation("Please enter your age and sex")),
            other => Err(unexpected_commit(self.step(), &other)),
        }
    }
}
