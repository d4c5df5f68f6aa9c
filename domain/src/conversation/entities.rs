//! Conversation entities and the reducer that mutates them.
//!
//! All changes to the turn sequence go through [`Conversation::apply`]. The
//! sequence is append-only: turns are never reordered or removed, and only
//! assistant turns have mutable text.

use crate::core::error::DomainError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a turn, unique within one [`Conversation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u64);

impl TurnId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One message in the conversation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: TurnId,
    sender: Sender,
    text: String,
    created_at: DateTime<Local>,
}

impl ConversationTurn {
    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// An assistant turn that has not received any text yet.
    pub fn is_pending(&self) -> bool {
        self.sender == Sender::Assistant && self.text.is_empty()
    }
}

/// A single state change applied to a [`Conversation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationAction {
    /// Append an immutable user turn.
    AppendUser { text: String },
    /// Append an empty assistant turn that later fragments are added to.
    AppendPlaceholder,
    /// Concatenate a streamed fragment onto the assistant turn with this id.
    AppendFragment { id: TurnId, fragment: String },
    /// Replace the whole text of the assistant turn with this id.
    ReplaceText { id: TurnId, text: String },
}

/// Ordered, append-only list of turns (Aggregate root)
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action and return the id of the turn it created or changed.
    pub fn apply(&mut self, action: ConversationAction) -> Result<TurnId, DomainError> {
        match action {
            ConversationAction::AppendUser { text } => {
                if text.trim().is_empty() {
                    return Err(DomainError::EmptyMessage);
                }
                Ok(self.push(Sender::User, text))
            }
            ConversationAction::AppendPlaceholder => Ok(self.push(Sender::Assistant, String::new())),
            ConversationAction::AppendFragment { id, fragment } => {
                let turn = self.assistant_turn_mut(id)?;
                turn.text.push_str(&fragment);
                Ok(id)
            }
            ConversationAction::ReplaceText { id, text } => {
                let turn = self.assistant_turn_mut(id)?;
                turn.text = text;
                Ok(id)
            }
        }
    }

    /// Append a user turn followed by its assistant placeholder.
    ///
    /// Returns `(user_id, placeholder_id)`. Nothing is appended when the
    /// user turn is rejected.
    pub fn begin_exchange(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(TurnId, TurnId), DomainError> {
        let user = self.apply(ConversationAction::AppendUser { text: text.into() })?;
        let placeholder = self.apply(ConversationAction::AppendPlaceholder)?;
        Ok((user, placeholder))
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn get(&self, id: TurnId) -> Option<&ConversationTurn> {
        self.turns.iter().find(|t| t.id == id)
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, sender: Sender, text: String) -> TurnId {
        self.next_id += 1;
        let id = TurnId(self.next_id);
        self.turns.push(ConversationTurn {
            id,
            sender,
            text,
            created_at: Local::now(),
        });
        id
    }

    fn assistant_turn_mut(&mut self, id: TurnId) -> Result<&mut ConversationTurn, DomainError> {
        let turn = self
            .turns
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::UnknownTurn(id.value()))?;
        if turn.sender != Sender::Assistant {
            return Err(DomainError::NotAssistantTurn(id.value()));
        }
        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_exchange_appends_user_then_placeholder() {
        let mut conversation = Conversation::new();
        let (user, placeholder) = conversation.begin_exchange("milk").unwrap();

        assert_eq!(conversation.len(), 2);
        let turns = conversation.turns();
        assert_eq!(turns[0].id(), user);
        assert_eq!(turns[0].sender(), Sender::User);
        assert_eq!(turns[0].text(), "milk");
        assert_eq!(turns[1].id(), placeholder);
        assert!(turns[1].is_pending());
    }

    #[test]
    fn test_blank_user_turn_is_rejected() {
        let mut conversation = Conversation::new();

        assert_eq!(
            conversation.begin_exchange("  \n"),
            Err(DomainError::EmptyMessage)
        );
        assert_eq!(
            conversation.apply(ConversationAction::AppendUser {
                text: String::new()
            }),
            Err(DomainError::EmptyMessage)
        );
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut conversation = Conversation::new();
        let (a, b) = conversation.begin_exchange("one").unwrap();
        let (c, d) = conversation.begin_exchange("two").unwrap();
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn test_fragments_concatenate_by_id() {
        let mut conversation = Conversation::new();
        let (_, first) = conversation.begin_exchange("milk").unwrap();
        let (_, second) = conversation.begin_exchange("bread").unwrap();

        for fragment in ["Sure", ", I'll", " add milk."] {
            conversation
                .apply(ConversationAction::AppendFragment {
                    id: first,
                    fragment: fragment.to_string(),
                })
                .unwrap();
        }

        assert_eq!(conversation.get(first).unwrap().text(), "Sure, I'll add milk.");
        assert_eq!(conversation.get(second).unwrap().text(), "");
    }

    #[test]
    fn test_replace_text() {
        let mut conversation = Conversation::new();
        let (_, placeholder) = conversation.begin_exchange("milk").unwrap();
        conversation
            .apply(ConversationAction::AppendFragment {
                id: placeholder,
                fragment: "partial".to_string(),
            })
            .unwrap();
        conversation
            .apply(ConversationAction::ReplaceText {
                id: placeholder,
                text: "Error: boom".to_string(),
            })
            .unwrap();
        assert_eq!(conversation.get(placeholder).unwrap().text(), "Error: boom");
    }

    #[test]
    fn test_user_turns_are_immutable() {
        let mut conversation = Conversation::new();
        let (user, _) = conversation.begin_exchange("milk").unwrap();
        let result = conversation.apply(ConversationAction::AppendFragment {
            id: user,
            fragment: "x".to_string(),
        });
        assert_eq!(result, Err(DomainError::NotAssistantTurn(user.value())));
        assert_eq!(conversation.get(user).unwrap().text(), "milk");
    }

    #[test]
    fn test_unknown_turn_is_rejected() {
        let mut conversation = Conversation::new();
        let result = conversation.apply(ConversationAction::ReplaceText {
            id: TurnId(42),
            text: "x".to_string(),
        });
        assert_eq!(result, Err(DomainError::UnknownTurn(42)));
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_apply_append_actions() {
        let mut conversation = Conversation::new();
        let user = conversation
            .apply(ConversationAction::AppendUser {
                text: "eggs".to_string(),
            })
            .unwrap();
        let placeholder = conversation
            .apply(ConversationAction::AppendPlaceholder)
            .unwrap();
        assert_eq!(conversation.last().unwrap().id(), placeholder);
        assert!(conversation.get(user).unwrap().is_user());
    }
}
