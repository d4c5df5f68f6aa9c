//! Configuration file loading for grocery-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment (`GROCERY_API_URL`, `GROCERY_CHAT_*`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./grocery-chat.toml` or `./.grocery-chat.toml`
//! 4. Global: `$XDG_CONFIG_HOME/grocery-chat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_URL, FileApiConfig, FileChatConfig, FileConfig,
    FileLogConfig, FileOutputConfig, FileVoiceConfig,
};
pub use loader::ConfigLoader;
