//! Scripted port implementations shared by the use case tests.

use crate::ports::chat_gateway::{ByteStream, ChatGateway, TransportError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::speech_recognizer::{RecognitionOptions, RecognitionSession, SpeechRecognizer};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use grocery_domain::{RecognitionEvent, VoiceError};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

enum Script {
    Body {
        chunks: Vec<Result<Bytes, TransportError>>,
        hang: bool,
    },
    Fail(TransportError),
}

/// Chat gateway that replays scripted replies, one per request.
pub(crate) struct ScriptedGateway {
    scripts: Mutex<VecDeque<Script>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn push(self, script: Script) -> Self {
        self.scripts.lock().unwrap().push_back(script);
        self
    }

    pub(crate) fn reply(self, chunks: &[&str]) -> Self {
        self.reply_bytes(chunks.iter().map(|c| c.as_bytes().to_vec()).collect())
    }

    pub(crate) fn reply_bytes(self, chunks: Vec<Vec<u8>>) -> Self {
        self.reply_results(chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect())
    }

    pub(crate) fn reply_results(self, chunks: Vec<Result<Bytes, TransportError>>) -> Self {
        self.push(Script::Body {
            chunks,
            hang: false,
        })
    }

    /// Deliver `chunks`, then never end the body.
    pub(crate) fn reply_then_hang(self, chunks: &[&str]) -> Self {
        let chunks = chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.as_bytes().to_vec())))
            .collect();
        self.push(Script::Body { chunks, hang: true })
    }

    pub(crate) fn fail(self, error: TransportError) -> Self {
        self.push(Script::Fail(error))
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn open_reply(&self, message: &str) -> Result<ByteStream, TransportError> {
        self.messages.lock().unwrap().push(message.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Network("no scripted reply".to_string()))?;

        match script {
            Script::Fail(error) => Err(error),
            Script::Body { chunks, hang: false } => Ok(stream::iter(chunks).boxed()),
            Script::Body { chunks, hang: true } => {
                Ok(stream::iter(chunks).chain(stream::pending()).boxed())
            }
        }
    }
}

/// Logger that keeps event types in memory.
#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingLogger {
    pub(crate) fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub(crate) fn payload(&self, event_type: &str) -> Option<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == event_type)
            .map(|(_, p)| p.clone())
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type.to_string(), event.payload));
    }
}

/// Recognizer that plays back scripted sessions.
///
/// A session scripted with `open = true` keeps its sender alive so the
/// session only ends when stopped.
pub(crate) struct ScriptedRecognizer {
    sessions: Mutex<VecDeque<(Vec<RecognitionEvent>, bool)>>,
    options: Mutex<Vec<RecognitionOptions>>,
    stops: Mutex<Vec<CancellationToken>>,
}

impl ScriptedRecognizer {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Mutex::new(VecDeque::new()),
            options: Mutex::new(Vec::new()),
            stops: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn session(self, events: Vec<RecognitionEvent>) -> Self {
        self.sessions.lock().unwrap().push_back((events, false));
        self
    }

    pub(crate) fn open_session(self, events: Vec<RecognitionEvent>) -> Self {
        self.sessions.lock().unwrap().push_back((events, true));
        self
    }

    pub(crate) fn options(&self) -> Vec<RecognitionOptions> {
        self.options.lock().unwrap().clone()
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stops
            .lock()
            .unwrap()
            .iter()
            .all(CancellationToken::is_cancelled)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn start(&self, options: RecognitionOptions) -> Result<RecognitionSession, VoiceError> {
        self.options.lock().unwrap().push(options);
        let (events, open) = self
            .sessions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| VoiceError::Recognizer("no scripted session".to_string()))?;

        let (tx, rx) = mpsc::channel(events.len() + 1);
        for event in events {
            let _ = tx.try_send(event);
        }

        let stop = CancellationToken::new();
        self.stops.lock().unwrap().push(stop.clone());
        if open {
            let token = stop.clone();
            tokio::spawn(async move {
                token.cancelled().await;
                let _ = tx.send(RecognitionEvent::End).await;
            });
        }
        Ok(RecognitionSession::new(rx, stop))
    }
}
