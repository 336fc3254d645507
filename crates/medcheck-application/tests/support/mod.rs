//! In-memory doubles for the reasoning service and the record store.

#![allow(dead_code)]

use async_trait::async_trait;
use medcheck_core::reasoning::{AnalyzeRequest, ReasoningClient};
use medcheck_core::session::{
    Condition, ConditionDetails, Probability, SessionReceipt, SessionRecordRepository,
    SessionSnapshot, TreatmentInfo,
};
use medcheck_core::{CheckerError, Result};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Analyze(String),
    Details(String),
    Treatments(String),
}

/// Reasoning client answering from a script.
///
/// Without scripted results, `analyze` returns Flu and Cold and every lookup
/// succeeds. With `hold_calls`, each call waits for `release` after signalling
/// `started`.
#[derive(Default)]
pub struct ScriptedReasoningClient {
    calls: Mutex<Vec<Call>>,
    analyze_results: Mutex<VecDeque<Result<Vec<Condition>>>>,
    unknown_conditions: Mutex<Vec<String>>,
    fail_next: Mutex<Option<CheckerError>>,
    hold: AtomicBool,
    pub started: Notify,
    pub release: Notify,
}

impl ScriptedReasoningClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_analyze(&self, result: Result<Vec<Condition>>) {
        self.analyze_results.lock().unwrap().push_back(result);
    }

    /// Lookups for `name` fail with `NotFound`.
    pub fn forget(&self, name: &str) {
        self.unknown_conditions.lock().unwrap().push(name.to_string());
    }

    pub fn fail_next(&self, error: CheckerError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn hold_calls(&self, hold: bool) {
        self.hold.store(hold, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    async fn enter(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.hold.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn lookup(&self, name: &str) -> Result<()> {
        if self.unknown_conditions.lock().unwrap().iter().any(|n| n == name) {
            return Err(CheckerError::not_found(name));
        }
        Ok(())
    }
}

pub fn flu_and_cold() -> Vec<Condition> {
    vec![
        Condition::new("", "Flu", Probability::High, "Influenza"),
        Condition::new("", "Cold", Probability::Medium, "Common cold"),
    ]
}

#[async_trait]
impl ReasoningClient for ScriptedReasoningClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Condition>> {
        self.enter(Call::Analyze(request.symptoms.clone())).await?;
        self.analyze_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(flu_and_cold()))
    }

    async fn fetch_details(&self, condition_name: &str) -> Result<ConditionDetails> {
        self.enter(Call::Details(condition_name.to_string())).await?;
        self.lookup(condition_name)?;
        Ok(ConditionDetails {
            overview: format!("About {condition_name}"),
            ..Default::default()
        })
    }

    async fn fetch_treatments(&self, condition_name: &str) -> Result<TreatmentInfo> {
        self.enter(Call::Treatments(condition_name.to_string())).await?;
        self.lookup(condition_name)?;
        Ok(TreatmentInfo::new(json!({"medications": [format!("{condition_name} relief")]})))
    }
}

/// Record store kept in memory; optionally failing every append.
#[derive(Default)]
pub struct MemoryRecordRepository {
    pub fail: bool,
    saved: Mutex<Vec<SessionSnapshot>>,
}

impl MemoryRecordRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<SessionSnapshot> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRecordRepository for MemoryRecordRepository {
    async fn append(&self, snapshot: &SessionSnapshot) -> Result<SessionReceipt> {
        if self.fail {
            return Err(CheckerError::storage("record store unavailable"));
        }
        self.saved.lock().unwrap().push(snapshot.clone());
        Ok(SessionReceipt {
            message: "Session saved successfully".into(),
            session_id: snapshot.session_id.clone(),
        })
    }
}
