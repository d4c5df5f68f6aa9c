//! UI events emitted by the conversation and voice use cases.
//!
//! These form the output port towards the presentation layer, which renders
//! them as they arrive. Sending never blocks; a dropped receiver is ignored.

use crate::ports::chat_gateway::ChatError;
use grocery_domain::{CaptureState, ConversationTurn, ExchangeState, RecognitionNotice, TurnId};

#[derive(Debug, Clone)]
pub enum UiEvent {
    // === Conversation ===
    /// A turn was appended (user turn or empty assistant placeholder).
    TurnAppended(ConversationTurn),
    /// A streamed fragment was concatenated onto an assistant turn.
    Fragment { id: TurnId, fragment: String },
    /// An assistant turn's text was replaced (failure diagnostic).
    TurnReplaced { id: TurnId, text: String },

    // === Exchange lifecycle ===
    ExchangeStateChanged(ExchangeState),
    /// Manual send and microphone controls should be enabled or disabled.
    InputAvailability { enabled: bool },
    /// The reply finished successfully; dependent views should refresh.
    ExchangeCompleted { id: TurnId },
    ExchangeFailed { id: TurnId, error: ChatError },
    ExchangeCancelled { id: TurnId },

    // === Voice capture ===
    CaptureStateChanged(CaptureState),
    InterimTranscript(String),
    RecognitionNotice(RecognitionNotice),
}
