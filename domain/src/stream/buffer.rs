//! Chunk buffer with an immediate-flush policy.

/// Accumulates decoded text until the consumer takes it.
///
/// The reader flushes once per read iteration, handing over everything
/// decoded so far. Fragments carry no semantic boundary: they may split
/// words, sentences or JSON tokens anywhere.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    text: String,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Take the whole buffer if it holds anything.
    pub fn flush(&mut self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.text))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_takes_everything() {
        let mut buffer = ChunkBuffer::new();
        buffer.push("Sure");
        buffer.push(", I'll");
        assert_eq!(buffer.flush().as_deref(), Some("Sure, I'll"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_buffer_does_not_flush() {
        let mut buffer = ChunkBuffer::new();
        assert_eq!(buffer.flush(), None);
        buffer.push("");
        assert_eq!(buffer.flush(), None);
    }
}
