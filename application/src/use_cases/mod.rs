//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat;
pub mod conversation;
pub mod voice_capture;

#[cfg(test)]
pub(crate) mod test_support;
