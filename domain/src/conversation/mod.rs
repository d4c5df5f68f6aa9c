//! Conversation domain.
//!
//! - [`entities::Conversation`]: ordered, append-only list of turns with a reducer
//! - [`entities::ConversationTurn`]: one user or assistant message
//! - [`exchange::ExchangeState`]: in-flight state of the current exchange

pub mod entities;
pub mod exchange;

/// Diagnostic text shown in place of an assistant reply when an exchange fails.
pub fn failure_text(message: &str) -> String {
    format!("Error: {message}. Please check your connection and try again.")
}
