//! Incremental UTF-8 decoding for byte streams.
//!
//! Network reads split the body at arbitrary byte offsets, so a multi-byte
//! character may straddle two reads. [`Utf8StreamDecoder`] keeps the
//! incomplete trailing sequence between calls and only emits whole characters.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// Stateful UTF-8 decoder that carries partial sequences across reads.
///
/// Invalid sequences are replaced with U+FFFD; a sequence that is merely
/// incomplete at the end of a chunk is held back until more bytes arrive.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all characters completed by it.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let data: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(bytes)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(bytes);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(data.len());
        let mut rest: &[u8] = &data;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &rest[valid_up_to + len..];
                        }
                        None => {
                            self.pending = rest[valid_up_to..].to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of stream.
    ///
    /// A sequence still incomplete here can never be finished and is emitted
    /// as a single replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT.to_string()
        }
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
