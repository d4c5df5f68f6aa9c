//! Infrastructure layer for grocery-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, DEFAULT_API_URL, FileApiConfig, FileConfig,
    FileOutputConfig, FileVoiceConfig,
};
pub use http::{HttpChatGateway, HttpGroceryList, build_client};
pub use logging::JsonlConversationLogger;
