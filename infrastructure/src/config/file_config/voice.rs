//! Voice configuration from TOML (`[voice]` section)

use grocery_application::VoiceConfig;
use grocery_domain::{DomainError, Language};
use serde::{Deserialize, Serialize};

/// Raw voice configuration from TOML
///
/// `language` stays a string here so loose spellings like `pt_br` are
/// accepted and a bad value is reported by validation, not by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVoiceConfig {
    pub language: String,
    pub continuous: bool,
}

impl Default for FileVoiceConfig {
    fn default() -> Self {
        Self {
            language: Language::default().as_tag().to_string(),
            continuous: false,
        }
    }
}

impl FileVoiceConfig {
    pub fn parse_language(&self) -> Result<Language, DomainError> {
        self.language.parse()
    }

    /// Convert to application config, falling back to the default language.
    pub fn to_voice_config(&self) -> VoiceConfig {
        VoiceConfig {
            language: self.parse_language().unwrap_or_default(),
            continuous: self.continuous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_language_spelling() {
        let config = FileVoiceConfig {
            language: "pt_br".to_string(),
            continuous: true,
        };
        let voice = config.to_voice_config();
        assert_eq!(voice.language, Language::PtBr);
        assert!(voice.continuous);
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let config = FileVoiceConfig {
            language: "klingon".to_string(),
            continuous: false,
        };
        assert!(config.parse_language().is_err());
        assert_eq!(config.to_voice_config().language, Language::EnUs);
    }
}
