//! Wizard step identifiers and their fixed ordering.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// One stage of the symptom-checking wizard.
///
/// Steps are visited strictly in declaration order; `Complete` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[strum(to_string = "intake")]
    Intake,
    #[strum(to_string = "analysis")]
    Analysis,
    #[strum(to_string = "condition selection")]
    ConditionSelection,
    #[strum(to_string = "details and treatment")]
    DetailsAndTreatment,
    #[strum(to_string = "complete")]
    Complete,
}

impl WizardStep {
    /// The step that follows this one, or `None` for `Complete`.
    pub fn next(self) -> Option<WizardStep> {
        Self::iter().skip_while(|s| *s != self).nth(1)
    }

    /// The step that precedes this one, or `None` for `Intake`.
    pub fn previous(self) -> Option<WizardStep> {
        Self::iter().take_while(|s| *s != self).last()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WizardStep::Complete)
    }

    /// 1-based position, used by front ends for "step N of M" labels.
    pub fn ordinal(self) -> usize {
        Self::iter().position(|s| s == self).unwrap_or_default() + 1
    }
}
