//! Domain layer for MEDCHECK.
//!
//! Holds the session data model, the wizard step ordering, the shared error
//! taxonomy and the capability traits (`ReasoningClient`,
//! `SessionRecordRepository`, `TranscriptSource`) the other crates implement.

pub mod config;
pub mod error;
pub mod reasoning;
pub mod session;
pub mod step;
pub mod voice;

// Re-export common types
pub use error::{CheckerError, Result};
pub use reasoning::{AnalyzeRequest, ReasoningClient};
pub use session::SessionState;
pub use step::WizardStep;
