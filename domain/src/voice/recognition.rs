//! Speech recognition events and error codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal delivered by a running recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Partial transcript; never submitted.
    Interim(String),
    /// Finalized transcript for one utterance.
    Final(String),
    /// The recognizer failed.
    Error(RecognitionErrorCode),
    /// The recognizer closed the session.
    End,
}

/// Error code reported by the speech recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionErrorCode {
    NotAllowed,
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    ServiceNotAllowed,
    Other(String),
}

impl RecognitionErrorCode {
    /// Parse the recognizer's wire code (e.g. `"not-allowed"`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" => RecognitionErrorCode::NotAllowed,
            "no-speech" => RecognitionErrorCode::NoSpeech,
            "aborted" => RecognitionErrorCode::Aborted,
            "audio-capture" => RecognitionErrorCode::AudioCapture,
            "network" => RecognitionErrorCode::Network,
            "service-not-allowed" => RecognitionErrorCode::ServiceNotAllowed,
            other => RecognitionErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            RecognitionErrorCode::NotAllowed => "not-allowed",
            RecognitionErrorCode::NoSpeech => "no-speech",
            RecognitionErrorCode::Aborted => "aborted",
            RecognitionErrorCode::AudioCapture => "audio-capture",
            RecognitionErrorCode::Network => "network",
            RecognitionErrorCode::ServiceNotAllowed => "service-not-allowed",
            RecognitionErrorCode::Other(code) => code,
        }
    }

    /// User-visible notice for this error.
    pub fn notice(&self) -> RecognitionNotice {
        match self {
            RecognitionErrorCode::NotAllowed | RecognitionErrorCode::ServiceNotAllowed => {
                RecognitionNotice::error(
                    "Microphone permission denied. Please allow microphone access and try again.",
                )
            }
            RecognitionErrorCode::NoSpeech => {
                RecognitionNotice::warning("No speech detected. Please try speaking again.")
            }
            RecognitionErrorCode::Aborted => RecognitionNotice::warning("Voice capture stopped."),
            RecognitionErrorCode::AudioCapture => {
                RecognitionNotice::error("No microphone was found or it could not be opened.")
            }
            RecognitionErrorCode::Network => {
                RecognitionNotice::error("Speech recognition needs a network connection.")
            }
            RecognitionErrorCode::Other(code) => {
                RecognitionNotice::error(format!("Speech recognition error: {code}"))
            }
        }
    }
}

impl fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Warning,
    Error,
}

/// Transient message shown to the user outside the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionNotice {
    pub severity: NoticeSeverity,
    pub message: String,
}

impl RecognitionNotice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in ["not-allowed", "no-speech", "aborted", "network", "language-not-supported"] {
            assert_eq!(RecognitionErrorCode::from_code(code).as_code(), code);
        }
    }

    #[test]
    fn test_permission_denied_is_error_notice() {
        let notice = RecognitionErrorCode::NotAllowed.notice();
        assert_eq!(notice.severity, NoticeSeverity::Error);
        assert!(notice.message.contains("permission denied"));
    }

    #[test]
    fn test_no_speech_is_warning_notice() {
        let notice = RecognitionErrorCode::NoSpeech.notice();
        assert_eq!(notice.severity, NoticeSeverity::Warning);
    }

    #[test]
    fn test_unknown_code_mentions_code() {
        let notice = RecognitionErrorCode::from_code("bad-grammar").notice();
        assert!(notice.message.contains("bad-grammar"));
    }
}
