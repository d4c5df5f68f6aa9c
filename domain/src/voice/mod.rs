//! Voice capture domain.
//!
//! - [`capture::VoiceCapture`]: idle / listening / finalizing state machine
//! - [`recognition::RecognitionEvent`]: signals from a recognition session

pub mod capture;
pub mod recognition;
