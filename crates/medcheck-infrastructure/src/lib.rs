//! Local infrastructure: platform paths, configuration loading and the
//! file-backed session record store.

pub mod config_service;
pub mod dto;
pub mod jsonl_session_record_repository;
pub mod paths;

pub use config_service::ConfigService;
pub use jsonl_session_record_repository::JsonlSessionRecordRepository;
pub use paths::MedcheckPaths;
