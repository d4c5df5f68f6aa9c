//! Backend API configuration from TOML (`[api]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Raw API configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the backend, without trailing path
    pub base_url: String,
    /// Connect and idle-read timeout in seconds; a live stream is not cut off
    pub timeout_seconds: Option<u64>,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: Some(120),
        }
    }
}

impl FileApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Base URL with trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_base_url() {
        let config = FileApiConfig {
            base_url: "http://api.local:9000/ ".to_string(),
            timeout_seconds: None,
        };
        assert_eq!(config.normalized_base_url(), "http://api.local:9000");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            FileApiConfig::default().timeout(),
            Some(Duration::from_secs(120))
        );
    }
}
