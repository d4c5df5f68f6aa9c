//! Conversation controller
//!
//! Owns the conversation and the exchange lock. A submission appends the
//! user turn and an empty assistant placeholder, streams the reply into the
//! placeholder by id, and settles back to [`ExchangeState::Idle`].
//!
//! Emits [`UiEvent`]s for the presentation layer to render. The internal
//! lock is never held across an await.

use crate::ports::chat_gateway::ChatError;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::ui_event::UiEvent;
use crate::use_cases::chat::ChatUseCase;
use grocery_domain::{
    Conversation, ConversationAction, ConversationTurn, ExchangeState, TurnId, failure_text,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Blank after trimming.
    Empty,
    /// Another exchange is in flight.
    Busy,
}

/// Result of [`ConversationController::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended.
    Rejected(RejectReason),
    Completed { reply: String },
    /// `reply` is the diagnostic that replaced the placeholder.
    Failed { reply: String, error: ChatError },
    /// `reply` is the partial text kept in the placeholder.
    Cancelled { reply: String },
}

impl SubmitOutcome {
    /// Final assistant text, if the submission was accepted.
    pub fn reply(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Rejected(_) => None,
            SubmitOutcome::Completed { reply }
            | SubmitOutcome::Failed { reply, .. }
            | SubmitOutcome::Cancelled { reply } => Some(reply),
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected(_))
    }
}

#[derive(Default)]
struct ControllerState {
    conversation: Conversation,
    exchange: ExchangeState,
    cancel: Option<CancellationToken>,
}

pub struct ConversationController {
    chat: ChatUseCase,
    state: Mutex<ControllerState>,
    tx: Option<mpsc::UnboundedSender<UiEvent>>,
    logger: Arc<dyn ConversationLogger>,
}

impl ConversationController {
    pub fn new(chat: ChatUseCase) -> Self {
        Self {
            chat,
            state: Mutex::new(ControllerState::default()),
            tx: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.tx = Some(tx);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Submit a user message and drive the exchange to completion.
    ///
    /// Blank text and submissions while another exchange is in flight are
    /// no-ops. Otherwise both turns are appended before the first await.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank submission");
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }

        let (turns, reply_id, token) = {
            let mut state = self.lock();
            let Some(next) = state.exchange.submit() else {
                debug!("Ignoring submission while {}", state.exchange);
                return SubmitOutcome::Rejected(RejectReason::Busy);
            };
            let (user_id, reply_id) = match state.conversation.begin_exchange(text) {
                Ok(ids) => ids,
                Err(e) => {
                    debug!("Ignoring submission: {}", e);
                    return SubmitOutcome::Rejected(RejectReason::Empty);
                }
            };
            state.exchange = next;
            let token = CancellationToken::new();
            state.cancel = Some(token.clone());

            let turns: Vec<ConversationTurn> = [user_id, reply_id]
                .iter()
                .filter_map(|id| state.conversation.get(*id).cloned())
                .collect();
            (turns, reply_id, token)
        };
        let guard = ExchangeGuard { controller: self };

        for turn in turns {
            self.emit(UiEvent::TurnAppended(turn));
        }
        self.emit(UiEvent::ExchangeStateChanged(ExchangeState::Sending));
        self.emit(UiEvent::InputAvailability { enabled: false });
        self.logger
            .log(ConversationEvent::exchange_started(reply_id.value(), text));
        info!("Exchange {} started", reply_id);

        let result = self.run_exchange(text, reply_id, &token).await;
        let reply = self.turn_text(reply_id);

        match result {
            Ok(fragments) => {
                info!("Exchange {} completed ({} fragments)", reply_id, fragments);
                self.logger.log(ConversationEvent::exchange_completed(
                    reply_id.value(),
                    &reply,
                    fragments,
                ));
                drop(guard);
                self.emit(UiEvent::ExchangeCompleted { id: reply_id });
                SubmitOutcome::Completed { reply }
            }
            Err(ChatError::Cancelled) => {
                info!("Exchange {} cancelled", reply_id);
                self.logger.log(ConversationEvent::exchange_cancelled(
                    reply_id.value(),
                    &reply,
                ));
                drop(guard);
                self.emit(UiEvent::ExchangeCancelled { id: reply_id });
                SubmitOutcome::Cancelled { reply }
            }
            Err(error) => {
                warn!("Exchange {} failed: {}", reply_id, error);
                let diagnostic = failure_text(&error.to_string());
                self.apply(ConversationAction::ReplaceText {
                    id: reply_id,
                    text: diagnostic.clone(),
                });
                self.emit(UiEvent::TurnReplaced {
                    id: reply_id,
                    text: diagnostic.clone(),
                });
                self.logger.log(ConversationEvent::exchange_failed(
                    reply_id.value(),
                    error.kind(),
                    &error.to_string(),
                ));
                drop(guard);
                self.emit(UiEvent::ExchangeFailed {
                    id: reply_id,
                    error: error.clone(),
                });
                SubmitOutcome::Failed {
                    reply: diagnostic,
                    error,
                }
            }
        }
    }

    async fn run_exchange(
        &self,
        message: &str,
        reply_id: TurnId,
        cancellation: &CancellationToken,
    ) -> Result<usize, ChatError> {
        let mut reply = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(ChatError::Cancelled),
            opened = self.chat.stream(message) => opened?,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(ChatError::Cancelled),
                next = reply.next_chunk() => next,
            };

            match next {
                None => return Ok(reply.fragments()),
                Some(Err(e)) => return Err(e),
                Some(Ok(fragment)) => self.append_fragment(reply_id, fragment),
            }
        }
    }

    fn append_fragment(&self, id: TurnId, fragment: String) {
        let entered_receiving = {
            let mut state = self.lock();
            if let Err(e) = state.conversation.apply(ConversationAction::AppendFragment {
                id,
                fragment: fragment.clone(),
            }) {
                warn!("Dropping fragment: {}", e);
                return;
            }
            let previous = state.exchange;
            state.exchange = previous.fragment();
            previous != state.exchange
        };

        if entered_receiving {
            self.emit(UiEvent::ExchangeStateChanged(ExchangeState::Receiving));
        }
        self.emit(UiEvent::Fragment { id, fragment });
    }

    /// Stop the in-flight exchange, keeping the text received so far.
    ///
    /// Returns false when nothing was in flight.
    pub fn cancel(&self) -> bool {
        let token = self.lock().cancel.clone();
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Copy of all turns in order.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.lock().conversation.turns().to_vec()
    }

    pub fn exchange_state(&self) -> ExchangeState {
        self.lock().exchange
    }

    pub fn is_in_flight(&self) -> bool {
        self.exchange_state().is_in_flight()
    }

    fn turn_text(&self, id: TurnId) -> String {
        self.lock()
            .conversation
            .get(id)
            .map(|turn| turn.text().to_string())
            .unwrap_or_default()
    }

    fn apply(&self, action: ConversationAction) {
        if let Err(e) = self.lock().conversation.apply(action) {
            warn!("Conversation update rejected: {}", e);
        }
    }

    fn emit(&self, event: UiEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Returns the controller to idle when the exchange ends, however it ends.
struct ExchangeGuard<'a> {
    controller: &'a ConversationController,
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.controller.lock();
            state.exchange = state.exchange.settle();
            state.cancel = None;
        }
        self.controller
            .emit(UiEvent::ExchangeStateChanged(ExchangeState::Idle));
        self.controller
            .emit(UiEvent::InputAvailability { enabled: true });
    }
}
