//! Voice dictation capability.
//!
//! Speech recognition is an external producer of symptom text. It pushes
//! transcripts into the same draft the keyboard edits, so dictated text goes
//! through exactly the same validation as typed text.

use crate::error::Result;
use tokio::sync::mpsc;

/// What a transcript source reports while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// The full transcript recognised so far.
    Transcript(String),
    /// Recognition failed; the source has stopped listening.
    Error(String),
    /// The source stopped listening on its own.
    Ended,
}

/// Channel a transcript source delivers events to.
pub type TranscriptSink = mpsc::UnboundedSender<TranscriptEvent>;

/// A speech-to-text input device.
pub trait TranscriptSource: Send {
    /// Begins listening; events are delivered to `sink` until `stop` or `Ended`.
    fn start(&mut self, sink: TranscriptSink) -> Result<()>;

    /// Stops listening. Calling it while idle does nothing.
    fn stop(&mut self);

    fn is_listening(&self) -> bool;
}
