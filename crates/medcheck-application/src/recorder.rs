//! SessionRecorder - persists completed sessions without blocking the wizard.

use medcheck_core::session::{SessionReceipt, SessionRecordRepository, SessionSnapshot};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Sends completed-session snapshots to a record repository.
///
/// A failed recording is logged and never surfaced as a wizard failure.
#[derive(Clone)]
pub struct SessionRecorder {
    repository: Arc<dyn SessionRecordRepository>,
}

impl SessionRecorder {
    pub fn new(repository: Arc<dyn SessionRecordRepository>) -> Self {
        Self { repository }
    }

    /// Appends the snapshot, returning the receipt on success.
    pub async fn record(&self, snapshot: SessionSnapshot) -> Option<SessionReceipt> {
        match self.repository.append(&snapshot).await {
            Ok(receipt) => {
                tracing::info!(
                    session_id = %snapshot.session_id,
                    record_id = %receipt.session_id,
                    "[SessionRecorder] Session recorded"
                );
                Some(receipt)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %snapshot.session_id,
                    "[SessionRecorder] Failed to record session: {}",
                    e
                );
                None
            }
        }
    }

    /// Spawns `record` on the runtime and returns its handle.
    pub fn record_in_background(&self, snapshot: SessionSnapshot) -> JoinHandle<Option<SessionReceipt>> {
        let recorder = self.clone();
        tokio::spawn(async move { recorder.record(snapshot).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medcheck_core::session::SessionState;
    use medcheck_core::{CheckerError, Result};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepository {
        fail: bool,
        saved: Mutex<Vec<SessionSnapshot>>,
    }

    #[async_trait]
    impl SessionRecordRepository for MemoryRepository {
        async fn append(&self, snapshot: &SessionSnapshot) -> Result<SessionReceipt> {
            if self.fail {
                return Err(CheckerError::storage("disk full"));
            }
            self.saved.lock().unwrap().push(snapshot.clone());
            Ok(SessionReceipt {
                message: "saved".into(),
                session_id: snapshot.session_id.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_background_recording_returns_receipt() {
        let repository = Arc::new(MemoryRepository::default());
        let recorder = SessionRecorder::new(repository.clone());
        let snapshot = SessionState::new().snapshot();

        let receipt = recorder
            .record_in_background(snapshot.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receipt.session_id, snapshot.session_id);
        assert_eq!(repository.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let repository = Arc::new(MemoryRepository {
            fail: true,
            ..Default::default()
        });
        let recorder = SessionRecorder::new(repository);
        assert!(recorder.record(SessionState::new().snapshot()).await.is_none());
    }
}
