//! Symptom text being composed from the keyboard and from dictation.

use crate::steps::StepInput;
use medcheck_core::Result;
use medcheck_core::voice::{TranscriptEvent, TranscriptSource};
use tokio::sync::mpsc;

/// One text buffer shared by typed and dictated symptoms.
///
/// Both producers write the same field, so the text reaches the Analysis step
/// through the same validation either way.
#[derive(Debug, Default)]
pub struct SymptomDraft {
    text: String,
    listening: bool,
    last_error: Option<String>,
    events: Option<mpsc::UnboundedReceiver<TranscriptEvent>>,
}

impl SymptomDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn type_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Applies one transcript event. Returns whether the text changed.
    pub fn apply(&mut self, event: TranscriptEvent) -> bool {
        match event {
            TranscriptEvent::Transcript(transcript) => {
                if transcript == self.text {
                    return false;
                }
                self.text = transcript;
                true
            }
            TranscriptEvent::Error(message) => {
                tracing::warn!("[SymptomDraft] Speech recognition error: {}", message);
                self.last_error = Some(message);
                self.listening = false;
                false
            }
            TranscriptEvent::Ended => {
                self.listening = false;
                false
            }
        }
    }

    /// Applies every event delivered so far without waiting for more.
    pub fn drain(&mut self) -> bool {
        let Some(mut events) = self.events.take() else {
            return false;
        };
        let mut changed = false;
        let mut closed = false;
        loop {
            match events.try_recv() {
                Ok(event) => changed |= self.apply(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    closed = true;
                    self.listening = false;
                    break;
                }
            }
        }
        if !closed {
            self.events = Some(events);
        }
        changed
    }

    /// Starts dictation from `source` into this draft.
    pub fn start_listening(&mut self, source: &mut dyn TranscriptSource) -> Result<()> {
        let (sink, events) = mpsc::unbounded_channel();
        source.start(sink)?;
        self.events = Some(events);
        self.listening = true;
        self.last_error = None;
        tracing::debug!("[SymptomDraft] Listening");
        Ok(())
    }

    /// Stops dictation and applies whatever was already transcribed.
    pub fn stop_listening(&mut self, source: &mut dyn TranscriptSource) {
        source.stop();
        self.drain();
        self.events = None;
        self.listening = false;
    }

    /// The draft as Analysis step input.
    pub fn to_input(&self) -> StepInput {
        StepInput::Symptoms(self.text.clone())
    }
}
