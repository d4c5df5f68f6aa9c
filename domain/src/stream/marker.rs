//! In-band error signal detection.
//!
//! The backend reports failures inside the body of a successful response by
//! writing a reserved marker followed by the error description, e.g.
//! `"Error: rate limited\n\n"`. Flushed chunks are checked before they reach
//! the conversation so the description is surfaced as a failure instead of
//! being shown as assistant text.

use thiserror::Error;

/// Marker the backend writes before an error description.
pub const DEFAULT_ERROR_MARKER: &str = "Error: ";

/// Error reported by the backend inside the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StreamContentError {
    pub message: String,
}

impl StreamContentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Scans flushed chunks for the error marker.
///
/// Besides the chunk itself, the detector checks the window formed by the
/// tail of the previous chunk and the head of the current one, so a marker
/// split across two flushes is still caught.
#[derive(Debug, Clone)]
pub struct ErrorSignalDetector {
    marker: String,
    tail: String,
}

impl ErrorSignalDetector {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            tail: String::new(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Inspect the next flushed chunk.
    pub fn inspect(&mut self, chunk: &str) -> Result<(), StreamContentError> {
        if self.marker.is_empty() {
            return Ok(());
        }

        if let Some(pos) = chunk.find(&self.marker) {
            return Err(Self::error_after(chunk, pos + self.marker.len()));
        }

        let window = if self.tail.is_empty() {
            chunk.to_string()
        } else {
            format!("{}{}", self.tail, chunk)
        };

        if let Some(pos) = window.find(&self.marker) {
            return Err(Self::error_after(&window, pos + self.marker.len()));
        }

        self.keep_tail(&window);
        Ok(())
    }

    fn error_after(text: &str, start: usize) -> StreamContentError {
        let message = text[start..].trim();
        if message.is_empty() {
            StreamContentError::new("Unknown error")
        } else {
            StreamContentError::new(message)
        }
    }

    // A tail shorter than the marker can never contain it whole.
    fn keep_tail(&mut self, window: &str) {
        let keep = self.marker.len().saturating_sub(1);
        let mut start = window.len().saturating_sub(keep);
        while !window.is_char_boundary(start) {
            start += 1;
        }
        self.tail = window[start..].to_string();
    }
}

impl Default for ErrorSignalDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes() {
        let mut detector = ErrorSignalDetector::default();
        assert!(detector.inspect("[{\"command\": \"AddItem\",").is_ok());
        assert!(detector.inspect(" \"value\": \"Milk\"}]").is_ok());
    }

    #[test]
    fn test_marker_chunk_is_error() {
        let mut detector = ErrorSignalDetector::default();
        let err = detector.inspect("Error: rate limited").unwrap_err();
        assert_eq!(err, StreamContentError::new("rate limited"));
    }

    #[test]
    fn test_backend_format_is_trimmed() {
        let mut detector = ErrorSignalDetector::default();
        let err = detector
            .inspect("Error: Connection refused\n\n")
            .unwrap_err();
        assert_eq!(err.message, "Connection refused");
    }

    #[test]
    fn test_marker_in_middle_of_chunk() {
        let mut detector = ErrorSignalDetector::default();
        let err = detector.inspect("[]Error: model not found").unwrap_err();
        assert_eq!(err.message, "model not found");
    }

    #[test]
    fn test_marker_split_across_chunks() {
        let mut detector = ErrorSignalDetector::default();
        assert!(detector.inspect("some text Err").is_ok());
        let err = detector.inspect("or: quota exceeded").unwrap_err();
        assert_eq!(err.message, "quota exceeded");
    }

    #[test]
    fn test_marker_split_with_multibyte_tail() {
        let mut detector = ErrorSignalDetector::new("Erro: ");
        assert!(detector.inspect("não é Er").is_ok());
        let err = detector.inspect("ro: falhou").unwrap_err();
        assert_eq!(err.message, "falhou");
    }

    #[test]
    fn test_marker_without_message() {
        let mut detector = ErrorSignalDetector::default();
        let err = detector.inspect("Error: ").unwrap_err();
        assert_eq!(err.message, "Unknown error");
    }

    #[test]
    fn test_empty_marker_disables_detection() {
        let mut detector = ErrorSignalDetector::new("");
        assert!(detector.inspect("Error: anything").is_ok());
    }
}
