//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Medical data types (`Condition`, `ConditionDetails`, `TreatmentInfo`, ...)
//! - `state`: The per-run `SessionState`
//! - `snapshot`: Finalized records (`SessionSnapshot`, `SessionReceipt`)
//! - `repository`: Repository trait for record persistence

mod model;
mod repository;
mod snapshot;
mod state;

// Re-export public API
pub use model::{Condition, ConditionDetails, PatientProfile, Probability, Sex, TreatmentInfo, with_unique_ids};
pub use repository::SessionRecordRepository;
pub use snapshot::{SessionReceipt, SessionSnapshot};
pub use state::SessionState;
