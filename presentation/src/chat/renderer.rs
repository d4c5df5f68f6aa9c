//! Renders [`UiEvent`]s to the terminal
//!
//! Fragments are written as they arrive, without buffering, so the reply
//! grows on screen in the order the backend produced it.

use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ReplySpinner;
use colored::Colorize;
use grocery_application::UiEvent;
use grocery_domain::{CaptureState, Sender};
use std::io::{self, Write};
use tracing::trace;

pub struct EventRenderer {
    show_progress: bool,
    echo_user: bool,
    spinner: ReplySpinner,
    /// An assistant line has been started and not yet terminated.
    line_open: bool,
    refresh_pending: bool,
}

impl EventRenderer {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            echo_user: false,
            spinner: ReplySpinner::hidden(),
            line_open: false,
            refresh_pending: false,
        }
    }

    /// Print user turns too (they are already on screen when typed).
    pub fn set_echo_user(&mut self, echo: bool) {
        self.echo_user = echo;
    }

    /// Whether a completed exchange asked for the list to be reloaded.
    /// Resets the flag.
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    pub fn render(&mut self, event: UiEvent, out: &mut impl Write) -> io::Result<()> {
        match event {
            UiEvent::TurnAppended(turn) => match turn.sender() {
                Sender::User if self.echo_user => {
                    writeln!(out, "{} {}", ConsoleFormatter::speaker(Sender::User), turn.text())?;
                }
                Sender::User => {}
                Sender::Assistant => {
                    self.spinner = ReplySpinner::start("Waiting for reply...", self.show_progress);
                }
            },
            UiEvent::Fragment { fragment, .. } => {
                self.open_line(out)?;
                write!(out, "{}", fragment)?;
                out.flush()?;
            }
            UiEvent::TurnReplaced { text, .. } => {
                self.spinner.clear();
                self.close_line(out)?;
                writeln!(
                    out,
                    "{} {}",
                    ConsoleFormatter::speaker(Sender::Assistant),
                    text.red()
                )?;
            }
            UiEvent::ExchangeCompleted { .. } => {
                self.open_line(out)?;
                self.close_line(out)?;
                self.refresh_pending = true;
            }
            UiEvent::ExchangeCancelled { .. } => {
                self.open_line(out)?;
                write!(out, " {}", "[stopped]".dimmed())?;
                self.close_line(out)?;
            }
            UiEvent::ExchangeFailed { error, .. } => {
                trace!("Exchange failed ({})", error.kind());
            }
            UiEvent::ExchangeStateChanged(state) => trace!("Exchange state: {}", state),
            UiEvent::InputAvailability { enabled } => trace!("Input enabled: {}", enabled),
            UiEvent::CaptureStateChanged(CaptureState::Listening) => {
                writeln!(out, "{}", ConsoleFormatter::format_info("Listening..."))?;
            }
            UiEvent::CaptureStateChanged(state) => trace!("Capture state: {}", state),
            UiEvent::InterimTranscript(text) => {
                writeln!(out, "  {}", format!("… {text}").dimmed())?;
            }
            UiEvent::RecognitionNotice(notice) => {
                self.spinner.clear();
                writeln!(out, "{}", ConsoleFormatter::format_notice(&notice))?;
            }
        }
        Ok(())
    }

    fn open_line(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.spinner.clear();
        if !self.line_open {
            write!(out, "{} ", ConsoleFormatter::speaker(Sender::Assistant))?;
            self.line_open = true;
        }
        Ok(())
    }

    fn close_line(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.line_open {
            writeln!(out)?;
            self.line_open = false;
        }
        out.flush()
    }
}
