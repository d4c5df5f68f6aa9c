//! Voice capture state machine
//!
//! ```text
//! Idle --start--> Listening --final result--> Finalizing --submitted--> Idle
//!                     |
//!                     +--stop / error / end-of-session--> Idle
//! ```
//!
//! A finalized result is handed out exactly once; later results, errors or
//! end signals for the same session do not produce another submission.

use super::recognition::RecognitionErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Idle,
    Listening,
    Finalizing,
}

impl CaptureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Listening => "listening",
            CaptureState::Finalizing => "finalizing",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from voice capture control
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("A chat exchange is in progress")]
    Busy,

    #[error("Voice capture is already {0}")]
    AlreadyActive(CaptureState),

    #[error("Speech recognition failed: {0}")]
    Recognition(RecognitionErrorCode),

    #[error("Speech recognizer unavailable: {0}")]
    Recognizer(String),
}

#[derive(Debug, Clone, Default)]
pub struct VoiceCapture {
    state: CaptureState,
}

impl VoiceCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Begin listening. `exchange_in_flight` blocks new sessions while the
    /// conversation is busy.
    pub fn start(&mut self, exchange_in_flight: bool) -> Result<(), VoiceError> {
        if self.state != CaptureState::Idle {
            return Err(VoiceError::AlreadyActive(self.state));
        }
        if exchange_in_flight {
            return Err(VoiceError::Busy);
        }
        self.state = CaptureState::Listening;
        Ok(())
    }

    /// Explicit stop from the user. Returns true if a session was listening.
    pub fn stop(&mut self) -> bool {
        self.leave_listening()
    }

    /// The recognizer reported an error.
    pub fn on_error(&mut self) -> bool {
        self.leave_listening()
    }

    /// The recognizer ended its session on its own.
    pub fn on_end(&mut self) -> bool {
        self.leave_listening()
    }

    /// A finalized transcript arrived.
    ///
    /// Returns the text to submit, or `None` if this session already
    /// produced its submission or the transcript is blank.
    pub fn on_final(&mut self, transcript: &str) -> Option<String> {
        if self.state != CaptureState::Listening {
            return None;
        }
        let text = transcript.trim();
        if text.is_empty() {
            self.state = CaptureState::Idle;
            return None;
        }
        self.state = CaptureState::Finalizing;
        Some(text.to_string())
    }

    /// The finalized transcript has been handed to the conversation.
    pub fn finish(&mut self) {
        if self.state == CaptureState::Finalizing {
            self.state = CaptureState::Idle;
        }
    }

    fn leave_listening(&mut self) -> bool {
        if self.state == CaptureState::Listening {
            self.state = CaptureState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_from_idle() {
        let mut capture = VoiceCapture::new();
        assert!(capture.start(false).is_ok());
        assert_eq!(capture.state(), CaptureState::Listening);
    }

    #[test]
    fn test_start_refused_while_exchange_in_flight() {
        let mut capture = VoiceCapture::new();
        assert_eq!(capture.start(true), Err(VoiceError::Busy));
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn test_start_refused_while_listening() {
        let mut capture = VoiceCapture::new();
        capture.start(false).unwrap();
        assert_eq!(
            capture.start(false),
            Err(VoiceError::AlreadyActive(CaptureState::Listening))
        );
    }

    #[test]
    fn test_final_result_submits_once() {
        let mut capture = VoiceCapture::new();
        capture.start(false).unwrap();

        assert_eq!(capture.on_final(" add milk "), Some("add milk".to_string()));
        assert_eq!(capture.state(), CaptureState::Finalizing);
        assert_eq!(capture.on_final("add milk"), None);

        // end-of-session arriving after the result does not reset finalizing
        assert!(!capture.on_end());
        assert_eq!(capture.state(), CaptureState::Finalizing);

        capture.finish();
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn test_start_refused_while_finalizing() {
        let mut capture = VoiceCapture::new();
        capture.start(false).unwrap();
        capture.on_final("eggs");
        assert_eq!(
            capture.start(false),
            Err(VoiceError::AlreadyActive(CaptureState::Finalizing))
        );
    }

    #[test]
    fn test_error_and_end_return_to_idle() {
        let mut capture = VoiceCapture::new();
        capture.start(false).unwrap();
        assert!(capture.on_error());
        assert_eq!(capture.state(), CaptureState::Idle);

        capture.start(false).unwrap();
        assert!(capture.on_end());
        assert_eq!(capture.state(), CaptureState::Idle);

        capture.start(false).unwrap();
        assert!(capture.stop());
        assert!(!capture.stop());
    }

    #[test]
    fn test_blank_transcript_returns_to_idle() {
        let mut capture = VoiceCapture::new();
        capture.start(false).unwrap();
        assert_eq!(capture.on_final("   "), None);
        assert_eq!(capture.state(), CaptureState::Idle);
    }
}
