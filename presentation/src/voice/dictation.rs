//! Terminal dictation recognizer
//!
//! Stands in for a microphone in the terminal: the utterance is one line
//! typed at a dictation prompt. Word-by-word interim transcripts are emitted
//! before the final one so the flow matches a live recognizer.
//!
//! Sessions are single-shot: one line per session, so
//! [`RecognitionOptions::continuous`] has no effect. Ctrl-C at the prompt
//! stops listening.

use async_trait::async_trait;
use grocery_application::{RecognitionOptions, RecognitionSession, SpeechRecognizer};
use grocery_domain::{RecognitionErrorCode, RecognitionEvent, VoiceError};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::io::{self, IsTerminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What the dictation prompt returned.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Utterance {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D or closed input.
    Closed,
}

/// Blocking read of one utterance; the argument is the prompt label.
type ReadUtterance = fn(&str) -> io::Result<Utterance>;

pub struct DictationRecognizer {
    interactive: bool,
    read: ReadUtterance,
}

impl DictationRecognizer {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            read: read_utterance,
        }
    }

    #[cfg(test)]
    fn with_reader(read: ReadUtterance) -> Self {
        Self {
            interactive: true,
            read,
        }
    }
}

impl Default for DictationRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for DictationRecognizer {
    async fn start(&self, options: RecognitionOptions) -> Result<RecognitionSession, VoiceError> {
        if options.continuous {
            debug!("Terminal dictation reads one line per session");
        }

        let (tx, rx) = mpsc::channel(16);
        let stop = CancellationToken::new();
        let token = stop.clone();
        let read = self.read;
        let label = format!("[{}] dictate", options.language);

        tokio::spawn(async move {
            let reading = tokio::task::spawn_blocking(move || read(&label));
            tokio::pin!(reading);

            let events = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    // The prompt owns the terminal until it returns
                    debug!("Dictation stopped; waiting for the prompt to close");
                    let _ = (&mut reading).await;
                    Vec::new()
                }
                result = &mut reading => match result {
                    Ok(Ok(utterance)) => transcript_events(utterance, options.interim_results),
                    Ok(Err(e)) => {
                        debug!("Failed to read dictation: {}", e);
                        vec![RecognitionEvent::Error(RecognitionErrorCode::AudioCapture)]
                    }
                    Err(_) => vec![RecognitionEvent::Error(RecognitionErrorCode::Aborted)],
                },
            };

            for event in events {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(RecognitionEvent::End).await;
        });

        Ok(RecognitionSession::new(rx, stop))
    }

    fn is_supported(&self) -> bool {
        self.interactive
    }
}

/// One line from a dedicated prompt.
///
/// The prompt lives only for this read, so the terminal is handed back
/// before the session ends.
fn read_utterance(label: &str) -> io::Result<Utterance> {
    let mut editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(label.to_string()),
        DefaultPromptSegment::Empty,
    );
    Ok(match editor.read_line(&prompt)? {
        Signal::Success(line) => Utterance::Line(line),
        Signal::CtrlC => Utterance::Interrupted,
        Signal::CtrlD => Utterance::Closed,
    })
}

/// Recognition events for one dictated utterance, `End` excluded.
fn transcript_events(utterance: Utterance, interim: bool) -> Vec<RecognitionEvent> {
    let line = match utterance {
        Utterance::Line(line) => line,
        Utterance::Interrupted => return Vec::new(),
        Utterance::Closed => return vec![RecognitionEvent::Error(RecognitionErrorCode::Aborted)],
    };
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return vec![RecognitionEvent::Error(RecognitionErrorCode::NoSpeech)];
    }

    let mut events = Vec::with_capacity(words.len());
    if interim {
        for end in 1..words.len() {
            events.push(RecognitionEvent::Interim(words[..end].join(" ")));
        }
    }
    events.push(RecognitionEvent::Final(words.join(" ")));
    events
}
