//! Application-level configuration.
//!
//! These types control how the use cases behave. They are filled from the
//! file/env configuration by the infrastructure layer.

use crate::ports::speech_recognizer::RecognitionOptions;
use grocery_domain::{DEFAULT_ERROR_MARKER, Language};

/// Chat behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Marker the backend writes before an in-band error description.
    pub error_marker: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn with_error_marker(marker: impl Into<String>) -> Self {
        Self {
            error_marker: marker.into(),
        }
    }
}

/// Voice capture configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceConfig {
    pub language: Language,
    /// Keep the recognizer open after the first utterance.
    pub continuous: bool,
}

impl VoiceConfig {
    /// Options for a new recognition session. Interim results are always
    /// requested so the UI can show what is being heard.
    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions {
            language: self.language,
            continuous: self.continuous,
            interim_results: true,
        }
    }
}
