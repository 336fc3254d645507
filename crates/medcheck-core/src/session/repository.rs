//! Session record repository trait.
//!
//! Defines the interface for persisting finalized sessions.

use super::snapshot::{SessionReceipt, SessionSnapshot};
use crate::error::Result;
use async_trait::async_trait;

/// An append-only store for completed session snapshots.
///
/// Decouples the wizard from where records end up (a remote service, a local
/// file). Records are never updated or deleted through this interface.
#[async_trait]
pub trait SessionRecordRepository: Send + Sync {
    /// Appends one snapshot.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionReceipt)`: The store accepted the record
    /// - `Err(_)`: The record was not stored
    async fn append(&self, snapshot: &SessionSnapshot) -> Result<SessionReceipt>;
}
