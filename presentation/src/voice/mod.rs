//! Terminal speech input

mod dictation;

pub use dictation::DictationRecognizer;
