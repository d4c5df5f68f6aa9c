//! Voice capture use case
//!
//! Runs one recognition session and submits its finalized transcript to the
//! [`ConversationController`] exactly once. Interim transcripts are only
//! shown. Recognition errors become notices and return capture to idle.
//!
//! Stopping capture stops the recognizer only; an exchange already started
//! from a transcript keeps running.

use crate::config::VoiceConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::speech_recognizer::SpeechRecognizer;
use crate::ports::ui_event::UiEvent;
use crate::use_cases::conversation::{ConversationController, SubmitOutcome};
use grocery_domain::{
    CaptureState, Language, RecognitionErrorCode, RecognitionEvent, VoiceCapture, VoiceError,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a listening session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// A transcript was finalized and submitted.
    Submitted {
        transcript: String,
        outcome: SubmitOutcome,
    },
    /// The recognizer reported an error; a notice was emitted.
    Failed(RecognitionErrorCode),
    /// The session ended (or was stopped) without a usable transcript.
    Ended,
}

pub struct VoiceCaptureUseCase {
    recognizer: Arc<dyn SpeechRecognizer>,
    controller: Arc<ConversationController>,
    capture: Mutex<VoiceCapture>,
    active: Mutex<Option<CancellationToken>>,
    config: Mutex<VoiceConfig>,
    tx: Option<mpsc::UnboundedSender<UiEvent>>,
    logger: Arc<dyn ConversationLogger>,
}

impl VoiceCaptureUseCase {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        controller: Arc<ConversationController>,
        config: VoiceConfig,
    ) -> Self {
        Self {
            recognizer,
            controller,
            capture: Mutex::new(VoiceCapture::new()),
            active: Mutex::new(None),
            config: Mutex::new(config),
            tx: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.tx = Some(tx);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn state(&self) -> CaptureState {
        self.capture().state()
    }

    pub fn language(&self) -> Language {
        self.config().language
    }

    /// Takes effect from the next session.
    pub fn set_language(&self, language: Language) {
        self.config().language = language;
        info!("Voice language set to {}", language);
    }

    /// Listen for one utterance and submit it.
    ///
    /// Refused while capture is already active or an exchange is in flight.
    pub async fn listen(&self) -> Result<VoiceOutcome, VoiceError> {
        if !self.recognizer.is_supported() {
            return Err(VoiceError::Recognizer(
                "speech recognition is not supported".to_string(),
            ));
        }

        self.capture().start(self.controller.is_in_flight())?;
        let mut guard = CaptureGuard {
            voice: self,
            stop: None,
            settled: false,
        };
        self.emit(UiEvent::CaptureStateChanged(CaptureState::Listening));

        let options = self.config().recognition_options();
        let mut session = match self.recognizer.start(options).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to start speech recognition: {}", e);
                return Err(e);
            }
        };
        *self.active() = Some(session.stop.clone());
        guard.stop = Some(session.stop.clone());
        info!("Listening ({})", options.language);

        let outcome = loop {
            match session.events.recv().await {
                Some(RecognitionEvent::Interim(text)) => {
                    debug!("Interim transcript: {}", text);
                    self.emit(UiEvent::InterimTranscript(text));
                }
                Some(RecognitionEvent::Final(text)) => {
                    let Some(transcript) = self.capture().on_final(&text) else {
                        self.emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
                        break VoiceOutcome::Ended;
                    };
                    self.emit(UiEvent::CaptureStateChanged(CaptureState::Finalizing));
                    session.stop.cancel();

                    self.logger.log(ConversationEvent::voice_transcript(
                        options.language.as_tag(),
                        &transcript,
                    ));
                    let outcome = self.controller.submit(&transcript).await;

                    self.capture().finish();
                    self.emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
                    break VoiceOutcome::Submitted {
                        transcript,
                        outcome,
                    };
                }
                Some(RecognitionEvent::Error(code)) => {
                    warn!("Speech recognition error: {}", code);
                    if self.capture().on_error() {
                        self.emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
                    }
                    self.emit(UiEvent::RecognitionNotice(code.notice()));
                    break VoiceOutcome::Failed(code);
                }
                Some(RecognitionEvent::End) | None => {
                    if self.capture().on_end() {
                        self.emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
                    }
                    break VoiceOutcome::Ended;
                }
            }
        };

        guard.settled = true;
        Ok(outcome)
    }

    /// Stop listening. Returns false when no session was listening.
    pub fn stop(&self) -> bool {
        if let Some(token) = self.active().as_ref() {
            token.cancel();
        }
        let stopped = self.capture().stop();
        if stopped {
            self.emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
        }
        stopped
    }

    fn emit(&self, event: UiEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    fn capture(&self) -> MutexGuard<'_, VoiceCapture> {
        self.capture.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn config(&self) -> MutexGuard<'_, VoiceConfig> {
        self.config.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Ends the recognition session when `listen` finishes or is dropped.
///
/// Unless the session settled on its own, capture is forced back to idle.
struct CaptureGuard<'a> {
    voice: &'a VoiceCaptureUseCase,
    stop: Option<CancellationToken>,
    settled: bool,
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if let Some(stop) = &self.stop {
            stop.cancel();
        }
        {
            // A newer session owns `active` once its token is set
            let mut active = self.voice.active();
            if active.as_ref().is_some_and(CancellationToken::is_cancelled) {
                *active = None;
            }
        }

        if self.settled {
            return;
        }
        let reset = {
            let mut capture = self.voice.capture();
            let was_active = capture.state() != CaptureState::Idle;
            capture.stop();
            capture.finish();
            was_active
        };
        if reset {
            debug!("Voice capture abandoned; back to idle");
            self.voice
                .emit(UiEvent::CaptureStateChanged(CaptureState::Idle));
        }
    }
}
