//! WizardEngine - the step state machine for one wizard session at a time.
//!
//! The engine owns the current `SessionState` and step, threads both through the
//! step controllers, and exposes the advance/retreat contract to front ends.
//!
//! # Concurrency
//!
//! All operations on the run go through one async mutex taken with `try_lock`, so
//! a second request while a commit is pending fails with `Busy` instead of
//! queueing. Each run carries a `CancellationToken`; `abandon` cancels it, and a
//! pending call then resolves to `Abandoned` without touching the session.

use crate::gateway::ReasoningGateway;
use crate::recorder::SessionRecorder;
use crate::steps::{StepController, StepInput, controller_for};
use medcheck_core::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use medcheck_core::reasoning::ReasoningClient;
use medcheck_core::session::{SessionReceipt, SessionSnapshot, SessionState};
use medcheck_core::{CheckerError, Result, WizardStep};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct WizardRun {
    session: SessionState,
    current: WizardStep,
    cancel: CancellationToken,
}

impl WizardRun {
    fn new() -> Self {
        Self {
            session: SessionState::new(),
            current: WizardStep::Intake,
            cancel: CancellationToken::new(),
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CheckerError::abandoned(self.session.id()));
        }
        Ok(())
    }

    fn controller(&self) -> Result<&'static dyn StepController> {
        controller_for(self.current).ok_or_else(|| {
            CheckerError::step(self.current, "the session is complete; start a new session")
        })
    }

    /// Moves back to an enterable step if the current one is not.
    fn reroute_if_needed(&mut self) -> Result<()> {
        let Some(controller) = controller_for(self.current) else {
            return Ok(());
        };
        if controller.can_enter(&self.session) {
            return Ok(());
        }

        let from = self.current;
        let target = self.reroute_target(controller);
        self.current = target;
        tracing::warn!(
            session_id = self.session.id(),
            from = %from,
            to = %target,
            "[WizardEngine] Step not enterable; rerouted"
        );
        Err(CheckerError::rerouted(
            from,
            format!("{} requires {}", from, controller.entry_requirement()),
            target,
        ))
    }

    fn reroute_target(&self, controller: &dyn StepController) -> WizardStep {
        let mut candidate = controller
            .reroute()
            .or_else(|| controller.step().previous())
            .unwrap_or(WizardStep::Intake);
        loop {
            match controller_for(candidate) {
                Some(c) if c.can_enter(&self.session) => return candidate,
                _ => match candidate.previous() {
                    Some(previous) => candidate = previous,
                    None => return WizardStep::Intake,
                },
            }
        }
    }
}

/// Drives one wizard session through its steps.
pub struct WizardEngine {
    client: Arc<dyn ReasoningClient>,
    recorder: Option<SessionRecorder>,
    request_timeout: Duration,
    run: Mutex<WizardRun>,
    /// Token of the current run, reachable while `run` is locked by a pending commit.
    active: StdMutex<CancellationToken>,
    recording: StdMutex<Option<JoinHandle<Option<SessionReceipt>>>>,
}

impl WizardEngine {
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        let run = WizardRun::new();
        let active = run.cancel.clone();
        Self {
            client,
            recorder: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            run: Mutex::new(run),
            active: StdMutex::new(active),
            recording: StdMutex::new(None),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_recorder(mut self, recorder: SessionRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub fn current_step(&self) -> Result<WizardStep> {
        Ok(self.lock_run()?.current)
    }

    /// Runs `f` against the current session and step.
    pub fn inspect<R>(&self, f: impl FnOnce(&SessionState, WizardStep) -> R) -> Result<R> {
        let run = self.lock_run()?;
        Ok(f(&run.session, run.current))
    }

    pub fn session_id(&self) -> Result<String> {
        self.inspect(|session, _| session.id().to_string())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        self.inspect(|session, _| session.snapshot())
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Validates and commits `input` on the current step without moving.
    ///
    /// On failure the step and any already entered input are kept.
    pub async fn submit(&self, input: StepInput) -> Result<WizardStep> {
        let mut run = self.lock_run()?;
        self.commit_current(&mut run, input).await?;
        Ok(run.current)
    }

    /// Commits `input` on the current step, then moves to the next step.
    ///
    /// Moving onto `Complete` hands the session snapshot to the recorder in the
    /// background.
    pub async fn advance(&self, input: StepInput) -> Result<WizardStep> {
        let mut run = self.lock_run()?;
        self.commit_current(&mut run, input).await?;

        let from = run.current;
        let next = from.next().ok_or_else(|| {
            CheckerError::step(from, "the session is complete; start a new session")
        })?;
        if let Some(controller) = controller_for(next) {
            if !controller.can_enter(&run.session) {
                return Err(CheckerError::step(
                    from,
                    format!("{} requires {}", next, controller.entry_requirement()),
                ));
            }
        }

        run.current = next;
        tracing::debug!(session_id = run.session.id(), from = %from, to = %next, "[WizardEngine] Advanced");

        if next.is_terminal() {
            tracing::info!(session_id = run.session.id(), "[WizardEngine] Session complete");
            self.start_recording(run.session.snapshot());
        }
        Ok(next)
    }

    /// Moves to the previous step, keeping every populated session field.
    pub fn retreat(&self) -> Result<WizardStep> {
        let mut run = self.lock_run()?;
        run.ensure_live()?;

        let from = run.current;
        if from.is_terminal() {
            return Err(CheckerError::step(
                from,
                "the session is complete; start a new session",
            ));
        }
        let previous = from
            .previous()
            .ok_or_else(|| CheckerError::step(from, "already at the first step"))?;

        run.current = previous;
        tracing::debug!(session_id = run.session.id(), from = %from, to = %previous, "[WizardEngine] Retreated");
        Ok(previous)
    }

    /// Reroutes away from the current step if its requirement no longer holds.
    pub fn ensure_enterable(&self) -> Result<WizardStep> {
        let mut run = self.lock_run()?;
        run.ensure_live()?;
        run.reroute_if_needed()?;
        Ok(run.current)
    }

    /// Tears down the current run. A pending call resolves to `Abandoned`.
    pub fn abandon(&self) {
        let token = lock_std(&self.active);
        tracing::info!("[WizardEngine] Session abandoned");
        token.cancel();
    }

    /// Abandons the current run and starts a fresh session at `Intake`.
    ///
    /// Waits for a pending commit to unwind first. Returns the new session id.
    pub async fn restart(&self) -> String {
        self.abandon();
        let mut run = self.run.lock().await;
        *run = WizardRun::new();
        *lock_std(&self.active) = run.cancel.clone();

        let id = run.session.id().to_string();
        tracing::info!(session_id = %id, "[WizardEngine] New session started");
        id
    }

    /// Waits for the background recording of the last completed session.
    ///
    /// Returns `None` when nothing was recorded or recording failed.
    pub async fn wait_for_recording(&self) -> Option<SessionReceipt> {
        let handle = lock_std(&self.recording).take()?;
        match handle.await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!("[WizardEngine] Recording task failed: {}", e);
                None
            }
        }
    }

    fn lock_run(&self) -> Result<MutexGuard<'_, WizardRun>> {
        self.run.try_lock().map_err(|_| CheckerError::Busy)
    }

    async fn commit_current(&self, run: &mut WizardRun, input: StepInput) -> Result<()> {
        run.ensure_live()?;
        run.reroute_if_needed()?;
        let controller = run.controller()?;

        let validated = controller.validate(&run.session, input).inspect_err(|e| {
            tracing::debug!(session_id = run.session.id(), step = %run.current, "[WizardEngine] Input rejected: {}", e);
        })?;

        let gateway = ReasoningGateway::new(
            self.client.clone(),
            self.request_timeout,
            run.session.id(),
            run.cancel.clone(),
        );
        let outcome = controller.commit(&mut run.session, validated, &gateway).await;
        run.ensure_live()?;

        if let Err(e) = &outcome {
            tracing::warn!(session_id = run.session.id(), step = %run.current, "[WizardEngine] Commit failed: {}", e);
        }
        outcome
    }

    fn start_recording(&self, snapshot: SessionSnapshot) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        let handle = recorder.record_in_background(snapshot);
        *lock_std(&self.recording) = Some(handle);
    }
}

fn lock_std<T>(mutex: &StdMutex<T>) -> StdMutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
