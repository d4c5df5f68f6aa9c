//! Domain layer for grocery-chat
//!
//! This crate contains the core logic of the assistant client: the
//! conversation reducer, streaming reply decoding, and the voice capture
//! state machine. It has no dependencies on I/O, runtimes or presentation.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! An append-only list of turns. Each exchange adds a user turn and an empty
//! assistant placeholder; streamed fragments are concatenated onto the
//! placeholder by id.
//!
//! ## Stream decoding
//!
//! Raw body bytes → [`Utf8StreamDecoder`] → [`ChunkBuffer`] (flushed once per
//! read) → [`ErrorSignalDetector`] → conversation.

pub mod conversation;
pub mod core;
pub mod grocery;
pub mod stream;
pub mod voice;

// Re-export commonly used types
pub use conversation::{
    entities::{Conversation, ConversationAction, ConversationTurn, Sender, TurnId},
    exchange::ExchangeState,
    failure_text,
};
pub use core::{error::DomainError, language::Language};
pub use grocery::{GroceryItem, NewGroceryItem};
pub use stream::{
    buffer::ChunkBuffer,
    decoder::Utf8StreamDecoder,
    marker::{DEFAULT_ERROR_MARKER, ErrorSignalDetector, StreamContentError},
};
pub use voice::{
    capture::{CaptureState, VoiceCapture, VoiceError},
    recognition::{NoticeSeverity, RecognitionErrorCode, RecognitionEvent, RecognitionNotice},
};
