//! Local append-only session record store, one JSON snapshot per line.

use async_trait::async_trait;
use medcheck_core::session::{SessionReceipt, SessionRecordRepository, SessionSnapshot};
use medcheck_core::{CheckerError, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct JsonlSessionRecordRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSessionRecordRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every recorded session, oldest first.
    ///
    /// A missing file is an empty store. Lines that do not parse are skipped.
    pub async fn read_all(&self) -> Result<Vec<SessionSnapshot>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CheckerError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SessionSnapshot>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    "[JsonlSessionRecordRepository] Skipping unreadable record: {}",
                    e
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl SessionRecordRepository for JsonlSessionRecordRepository {
    async fn append(&self, snapshot: &SessionSnapshot) -> Result<SessionReceipt> {
        let mut line = serde_json::to_string(snapshot)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            path = %self.path.display(),
            session_id = %snapshot.session_id,
            "[JsonlSessionRecordRepository] Appended session record"
        );
        Ok(SessionReceipt {
            message: format!("Session saved to {}", self.path.display()),
            session_id: snapshot.session_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medcheck_core::session::{PatientProfile, SessionState, Sex};

    fn completed_session(symptoms: &str) -> SessionSnapshot {
        let mut session = SessionState::new();
        session
            .commit_patient(PatientProfile {
                age: 61,
                sex: Sex::Male,
            })
            .unwrap();
        session.set_symptoms(symptoms);
        session.snapshot()
    }

    #[tokio::test]
    async fn test_append_then_read_all() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonlSessionRecordRepository::new(dir.path().join("nested/sessions.jsonl"));

        let first = completed_session("chest tightness");
        let second = completed_session("swollen ankles");
        let receipt = repository.append(&first).await.unwrap();
        repository.append(&second).await.unwrap();

        assert_eq!(receipt.session_id, first.session_id);
        let records = repository.read_all().await.unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_and_bad_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.jsonl");
        let repository = JsonlSessionRecordRepository::new(&path);
        assert!(repository.read_all().await.unwrap().is_empty());

        let good = completed_session("rash");
        std::fs::write(
            &path,
            format!("not json\n\n{}\n", serde_json::to_string(&good).unwrap()),
        )
        .unwrap();
        assert_eq!(repository.read_all().await.unwrap(), vec![good]);
    }

    #[tokio::test]
    async fn test_records_use_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.jsonl");
        let repository = JsonlSessionRecordRepository::new(&path);
        repository.append(&completed_session("fatigue")).await.unwrap();

        let line = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert!(value.get("sessionId").is_some());
        assert!(value.get("completedAt").is_some());
        assert_eq!(value["sex"], "male");
    }
}
