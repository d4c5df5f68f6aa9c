//! Application layer for grocery-chat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatConfig, VoiceConfig};
pub use ports::{
    chat_gateway::{ByteStream, ChatError, ChatGateway, TransportError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    grocery_list::{GroceryListError, GroceryListPort},
    speech_recognizer::{RecognitionOptions, RecognitionSession, SpeechRecognizer},
    ui_event::UiEvent,
};
pub use use_cases::chat::{ChatUseCase, ReplyStream};
pub use use_cases::conversation::{ConversationController, RejectReason, SubmitOutcome};
pub use use_cases::voice_capture::{VoiceCaptureUseCase, VoiceOutcome};
