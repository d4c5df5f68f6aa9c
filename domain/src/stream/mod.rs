//! Streaming reply decoding.
//!
//! - [`decoder::Utf8StreamDecoder`]: bytes to text, safe across read boundaries
//! - [`buffer::ChunkBuffer`]: immediate-flush text buffer
//! - [`marker::ErrorSignalDetector`]: in-band error marker detection

pub mod buffer;
pub mod decoder;
pub mod marker;
