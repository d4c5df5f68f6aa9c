//! Exchange state machine
//!
//! Tracks whether a chat exchange is in flight for a conversation. A new
//! submission is only accepted from [`ExchangeState::Idle`].
//!
//! ```text
//! Idle --submit--> Sending --first fragment--> Receiving
//!   ^                 |                            |
//!   +-----settle------+------------settle----------+
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeState {
    /// No exchange in flight; input controls are enabled.
    #[default]
    Idle,
    /// Request issued, no fragment received yet.
    Sending,
    /// At least one fragment has arrived.
    Receiving,
}

impl ExchangeState {
    /// Transition for an accepted submission, or `None` when busy.
    pub fn submit(self) -> Option<ExchangeState> {
        match self {
            ExchangeState::Idle => Some(ExchangeState::Sending),
            ExchangeState::Sending | ExchangeState::Receiving => None,
        }
    }

    /// Transition when a fragment arrives.
    pub fn fragment(self) -> ExchangeState {
        match self {
            ExchangeState::Idle => ExchangeState::Idle,
            ExchangeState::Sending | ExchangeState::Receiving => ExchangeState::Receiving,
        }
    }

    /// Transition when the exchange resolves, fails or is cancelled.
    pub fn settle(self) -> ExchangeState {
        ExchangeState::Idle
    }

    pub fn is_in_flight(&self) -> bool {
        !matches!(self, ExchangeState::Idle)
    }

    /// Whether manual send and microphone controls should be enabled.
    pub fn accepts_input(&self) -> bool {
        matches!(self, ExchangeState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Sending => "sending",
            ExchangeState::Receiving => "receiving",
        }
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
