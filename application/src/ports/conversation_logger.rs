//! Port for the conversation transcript log.
//!
//! Separate from `tracing` diagnostics: this records what was said in each
//! exchange in a machine-readable form (one record per event).

use serde_json::{Value, json};

/// A structured transcript record.
pub struct ConversationEvent {
    /// Record type, e.g. `"exchange_started"`.
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn exchange_started(turn_id: u64, message: &str) -> Self {
        Self::new(
            "exchange_started",
            json!({ "turn_id": turn_id, "message": message }),
        )
    }

    pub fn exchange_completed(turn_id: u64, reply: &str, fragments: usize) -> Self {
        Self::new(
            "exchange_completed",
            json!({ "turn_id": turn_id, "reply": reply, "fragments": fragments }),
        )
    }

    pub fn exchange_failed(turn_id: u64, kind: &str, error: &str) -> Self {
        Self::new(
            "exchange_failed",
            json!({ "turn_id": turn_id, "kind": kind, "error": error }),
        )
    }

    pub fn exchange_cancelled(turn_id: u64, partial: &str) -> Self {
        Self::new(
            "exchange_cancelled",
            json!({ "turn_id": turn_id, "partial": partial }),
        )
    }

    pub fn voice_transcript(language: &str, transcript: &str) -> Self {
        Self::new(
            "voice_transcript",
            json!({ "language": language, "transcript": transcript }),
        )
    }
}

/// Sink for transcript records.
///
/// `log` is synchronous and infallible so a broken log never interrupts a
/// conversation.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger that drops everything.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
