//! Adapters for the external medical reasoning service.
//!
//! - [`HttpReasoningClient`]: analysis, condition details and treatments
//! - [`HttpSessionRecordRepository`]: remote storage of finished sessions

mod endpoint;
pub mod http_reasoning_client;
pub mod http_session_record_repository;
mod wire;

pub use http_reasoning_client::HttpReasoningClient;
pub use http_session_record_repository::HttpSessionRecordRepository;
