//! Application layer for the symptom checker.
//!
//! Hosts the step controllers and the `WizardEngine` that sequences them, the
//! `ReasoningGateway` every reasoning call goes through, the background
//! `SessionRecorder`, and `SymptomDraft` for combined keyboard and voice input.

pub mod engine;
pub mod gateway;
pub mod recorder;
pub mod steps;
pub mod symptom_draft;

pub use engine::WizardEngine;
pub use gateway::ReasoningGateway;
pub use recorder::SessionRecorder;
pub use steps::{StepController, StepInput, ValidatedInput};
pub use symptom_draft::SymptomDraft;
