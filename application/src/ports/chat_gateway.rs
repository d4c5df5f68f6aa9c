//! Chat gateway port
//!
//! Defines how the application layer opens a streamed chat reply. Adapters
//! return the raw body as a stream of byte chunks; decoding, flushing and
//! error detection happen in [`ChatUseCase`](crate::use_cases::chat::ChatUseCase).

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use grocery_domain::StreamContentError;
use std::pin::Pin;
use thiserror::Error;

/// Raw response body, pulled one chunk at a time.
///
/// Whoever holds this owns the underlying reader; dropping it releases the
/// connection.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Failures at the HTTP level
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Chat request failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Response body is empty")]
    MissingBody,

    #[error("Network error: {0}")]
    Network(String),
}

/// Everything a chat exchange can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Content(#[from] StreamContentError),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Reply cancelled")]
    Cancelled,
}

impl ChatError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }

    /// Short label used in logs and conversation records.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Transport(_) => "transport",
            ChatError::Content(_) => "content",
            ChatError::EmptyMessage => "empty_message",
            ChatError::Cancelled => "cancelled",
        }
    }
}

/// Gateway to the chat backend
///
/// Implementations issue exactly one request per call and hand back the
/// body without reading it.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send `message` and open the streamed reply.
    ///
    /// Fails with [`TransportError::Status`] on a non-success status and
    /// [`TransportError::MissingBody`] when the response has no body.
    async fn open_reply(&self, message: &str) -> Result<ByteStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_contains_status_and_body() {
        let error = ChatError::from(TransportError::Status {
            status: 500,
            body: "internal error".to_string(),
        });
        let text = error.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("internal error"));
        assert_eq!(error.kind(), "transport");
    }

    #[test]
    fn test_content_error_displays_message_only() {
        let error = ChatError::from(StreamContentError::new("rate limited"));
        assert_eq!(error.to_string(), "rate limited");
        assert!(!error.is_cancelled());
    }
}
