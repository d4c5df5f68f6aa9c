//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application config.

mod api;
mod output;
mod voice;

pub use api::{DEFAULT_API_URL, FileApiConfig};
pub use output::FileOutputConfig;
pub use voice::FileVoiceConfig;

use grocery_application::ChatConfig;
use grocery_domain::DEFAULT_ERROR_MARKER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("api.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("api.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("chat.error_marker cannot be empty")]
    EmptyErrorMarker,

    #[error("voice.language '{0}' is not supported (expected en-US or pt-BR)")]
    InvalidLanguage(String),
}

/// Raw chat configuration from TOML (`[chat]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Marker the backend writes before an in-band error description
    pub error_marker: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
        }
    }
}

/// Raw log configuration from TOML (`[log]` section)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Directory for JSONL conversation transcripts
    pub conversation_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend location and timeouts
    pub api: FileApiConfig,
    /// Reply stream handling
    pub chat: FileChatConfig,
    /// Speech recognition settings
    pub voice: FileVoiceConfig,
    /// Conversation transcript settings
    pub log: FileLogConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if let Err(e) = reqwest::Url::parse(url) {
            return Err(ConfigValidationError::InvalidBaseUrl {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }

        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.api.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.chat.error_marker.is_empty() {
            return Err(ConfigValidationError::EmptyErrorMarker);
        }

        if self.voice.parse_language().is_err() {
            return Err(ConfigValidationError::InvalidLanguage(
                self.voice.language.clone(),
            ));
        }

        Ok(())
    }

    pub fn to_chat_config(&self) -> ChatConfig {
        ChatConfig::with_error_marker(self.chat.error_marker.clone())
    }
}
