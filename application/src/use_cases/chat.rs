//! Chat use case
//!
//! Sends one message to the backend and turns the raw reply body into a lazy
//! sequence of text fragments.
//!
//! # Pipeline
//!
//! ```text
//! ByteStream ──▶ Utf8StreamDecoder ──▶ ChunkBuffer ──▶ ErrorSignalDetector ──▶ fragment
//!              (holds split chars)   (flush per read)    (in-band "Error: ")
//! ```
//!
//! Each network read produces at most one fragment; nothing is batched
//! across reads.

use crate::config::ChatConfig;
use crate::ports::chat_gateway::{ByteStream, ChatError, ChatGateway};
use futures::{Stream, StreamExt};
use grocery_domain::{ChunkBuffer, ErrorSignalDetector, Utf8StreamDecoder};
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for a single streamed chat request.
pub struct ChatUseCase {
    gateway: Arc<dyn ChatGateway>,
    config: ChatConfig,
}

impl ChatUseCase {
    pub fn new(gateway: Arc<dyn ChatGateway>, config: ChatConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Issue the request and return the reply as a pull-based stream.
    ///
    /// Transport failures that happen before the body is available (status,
    /// missing body, connect errors) are returned here; failures during the
    /// body are yielded by [`ReplyStream::next_chunk`].
    pub async fn stream(&self, message: &str) -> Result<ReplyStream, ChatError> {
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        info!("Sending chat message ({} chars)", message.chars().count());
        let source = self.gateway.open_reply(message).await?;
        Ok(ReplyStream::new(
            source,
            ErrorSignalDetector::new(self.config.error_marker.clone()),
        ))
    }

    /// Callback form of [`stream`](Self::stream).
    ///
    /// `on_chunk` receives each new fragment in arrival order. Returns `Ok`
    /// only after the body ended and every fragment was delivered; on error no
    /// fragment is delivered afterwards.
    pub async fn chat<F>(&self, message: &str, mut on_chunk: F) -> Result<(), ChatError>
    where
        F: FnMut(&str),
    {
        let mut reply = self.stream(message).await?;
        while let Some(fragment) = reply.next_chunk().await {
            on_chunk(&fragment?);
        }
        Ok(())
    }
}

/// A streamed reply in progress.
///
/// Finite and not restartable. The underlying reader is dropped as soon as
/// the body ends or an error is yielded, and in any case when this value is
/// dropped.
pub struct ReplyStream {
    source: Option<ByteStream>,
    decoder: Utf8StreamDecoder,
    buffer: ChunkBuffer,
    detector: ErrorSignalDetector,
    fragments: usize,
}

impl ReplyStream {
    pub fn new(source: ByteStream, detector: ErrorSignalDetector) -> Self {
        Self {
            source: Some(source),
            decoder: Utf8StreamDecoder::new(),
            buffer: ChunkBuffer::new(),
            detector,
            fragments: 0,
        }
    }

    /// Next fragment, `Some(Err(_))` once on failure, then `None` forever.
    pub async fn next_chunk(&mut self) -> Option<Result<String, ChatError>> {
        loop {
            let source = self.source.as_mut()?;

            match source.next().await {
                Some(Ok(bytes)) => {
                    let text = self.decoder.decode(&bytes);
                    self.buffer.push(&text);
                }
                Some(Err(e)) => {
                    self.source = None;
                    return Some(Err(e.into()));
                }
                None => {
                    let rest = self.decoder.finish();
                    self.buffer.push(&rest);
                    self.source = None;
                    debug!("Reply body ended after {} fragments", self.fragments);
                }
            }

            if let Some(fragment) = self.buffer.flush() {
                if let Err(e) = self.detector.inspect(&fragment) {
                    self.source = None;
                    return Some(Err(e.into()));
                }
                self.fragments += 1;
                debug!(bytes = fragment.len(), "Reply fragment");
                return Some(Ok(fragment));
            }
        }
    }

    /// Number of fragments delivered so far.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Whether the reader has been released.
    pub fn is_finished(&self) -> bool {
        self.source.is_none()
    }

    /// Adapt into a [`Stream`] of fragments.
    pub fn into_stream(self) -> impl Stream<Item = Result<String, ChatError>> + Send {
        futures::stream::unfold(self, |mut reply| async move {
            reply.next_chunk().await.map(|item| (item, reply))
        })
    }
}

impl Drop for ReplyStream {
    fn drop(&mut self) {
        if self.source.is_some() {
            debug!(
                "Reply stream released before end of body ({} fragments)",
                self.fragments
            );
        }
    }
}
