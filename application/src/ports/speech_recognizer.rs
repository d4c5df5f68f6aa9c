//! Speech recognizer port
//!
//! A recognizer runs one session at a time and reports transcripts, errors
//! and end-of-session through a channel. The session stops when its
//! [`CancellationToken`] is cancelled; the recognizer then sends
//! [`RecognitionEvent::End`].

use async_trait::async_trait;
use grocery_domain::{Language, RecognitionEvent, VoiceError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Options for a recognition session
#[derive(Debug, Clone, Copy, Default)]
pub struct RecognitionOptions {
    pub language: Language,
    /// Keep listening after the first utterance.
    pub continuous: bool,
    /// Deliver interim transcripts.
    pub interim_results: bool,
}

/// An active recognition session.
pub struct RecognitionSession {
    pub events: mpsc::Receiver<RecognitionEvent>,
    pub stop: CancellationToken,
}

impl RecognitionSession {
    pub fn new(events: mpsc::Receiver<RecognitionEvent>, stop: CancellationToken) -> Self {
        Self { events, stop }
    }
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start listening.
    async fn start(&self, options: RecognitionOptions) -> Result<RecognitionSession, VoiceError>;

    /// Whether the platform offers speech recognition at all.
    fn is_supported(&self) -> bool {
        true
    }
}
