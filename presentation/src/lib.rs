//! Presentation layer for grocery-chat
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporting, the terminal dictation recognizer and the
//! interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod voice;

// Re-export commonly used types
pub use chat::{ChatRepl, EventRenderer, ReplCommand};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ReplySpinner;
pub use voice::DictationRecognizer;
