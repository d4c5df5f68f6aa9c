//! REPL (Read-Eval-Print Loop) for the grocery assistant

use crate::chat::command::ReplCommand;
use crate::chat::renderer::EventRenderer;
use crate::output::console::ConsoleFormatter;
use grocery_application::{
    ConversationController, GroceryListPort, RejectReason, SubmitOutcome, UiEvent,
    VoiceCaptureUseCase, VoiceOutcome,
};
use grocery_domain::{Language, NewGroceryItem};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 500;

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<ConversationController>,
    voice: Arc<VoiceCaptureUseCase>,
    list: Arc<dyn GroceryListPort>,
    events: mpsc::UnboundedReceiver<UiEvent>,
    renderer: EventRenderer,
    api_url: String,
    save_history: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl
    ///
    /// `events` must be the receiving end of the sender given to the
    /// controller and the voice use case.
    pub fn new(
        controller: Arc<ConversationController>,
        voice: Arc<VoiceCaptureUseCase>,
        list: Arc<dyn GroceryListPort>,
        events: mpsc::UnboundedReceiver<UiEvent>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            voice,
            list,
            events,
            renderer: EventRenderer::new(true),
            api_url: api_url.into(),
            save_history: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.renderer = EventRenderer::new(show);
        self
    }

    /// Set whether input history is persisted between sessions
    pub fn with_history(mut self, save: bool) -> Self {
        self.save_history = save;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(">>".to_string()),
            DefaultPromptSegment::Empty,
        );

        print!(
            "{}",
            ConsoleFormatter::welcome(&self.api_url, self.voice.language())
        );
        self.print_list().await;

        loop {
            let signal = tokio::task::block_in_place(|| editor.read_line(&prompt))?;
            let line = match signal {
                Signal::Success(line) => line,
                Signal::CtrlC => continue,
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            };

            let Some(command) = ReplCommand::parse(&line) else {
                continue;
            };
            if !self.handle(command).await {
                break;
            }
        }

        Ok(())
    }

    /// Send one message, stream the reply and show the list afterwards.
    ///
    /// Returns true when the exchange completed.
    pub async fn run_once(&mut self, message: &str) -> bool {
        let controller = Arc::clone(&self.controller);
        let outcome = self
            .drive(controller.submit(message), || {
                controller.cancel();
            })
            .await;
        self.refresh_if_needed().await;
        matches!(outcome, SubmitOutcome::Completed { .. })
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        if !self.save_history {
            return editor;
        }

        let Some(path) = history_path() else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Input history unavailable: {}", e);
                editor
            }
        }
    }

    /// Returns false when the REPL should exit.
    async fn handle(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Chat(text) => self.converse(&text).await,
            ReplCommand::Voice => self.dictate().await,
            ReplCommand::List => self.print_list().await,
            ReplCommand::Add(description) => self.add_item(&description).await,
            ReplCommand::Remove(id) => match self.list.delete(id).await {
                Ok(()) => {
                    println!("{}", ConsoleFormatter::format_info(&format!("Removed {id}")));
                    self.print_list().await;
                }
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Check(id) => self.set_checked(id, true).await,
            ReplCommand::Uncheck(id) => self.set_checked(id, false).await,
            ReplCommand::Language(None) => {
                print!("{}", ConsoleFormatter::format_languages(self.voice.language()));
            }
            ReplCommand::Language(Some(tag)) => match tag.parse::<Language>() {
                Ok(language) => {
                    self.voice.set_language(language);
                    println!(
                        "{}",
                        ConsoleFormatter::format_info(&format!("Voice language set to {language}"))
                    );
                }
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::History => {
                print!("{}", ConsoleFormatter::format_history(&self.controller.snapshot()));
            }
            ReplCommand::Health => match self.list.health().await {
                Ok(message) => println!("{}", ConsoleFormatter::format_info(&message)),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Help => print!("{}", ConsoleFormatter::help()),
            ReplCommand::Quit => {
                println!("Bye!");
                return false;
            }
            ReplCommand::Usage(usage) => {
                println!("{}", ConsoleFormatter::format_error(&format!("Usage: {usage}")));
            }
            ReplCommand::Unknown(name) => {
                println!(
                    "{}",
                    ConsoleFormatter::format_error(&format!(
                        "Unknown command: {name}. Type /help for commands."
                    ))
                );
            }
        }
        true
    }

    async fn converse(&mut self, text: &str) {
        let controller = Arc::clone(&self.controller);
        let outcome = self
            .drive(controller.submit(text), || {
                controller.cancel();
            })
            .await;

        if let SubmitOutcome::Rejected(RejectReason::Busy) = outcome {
            println!(
                "{}",
                ConsoleFormatter::format_info("Still waiting for the previous reply.")
            );
        }
        self.refresh_if_needed().await;
    }

    async fn dictate(&mut self) {
        if !self.voice.is_supported() {
            println!(
                "{}",
                ConsoleFormatter::format_error("Dictation needs an interactive terminal.")
            );
            return;
        }

        let voice = Arc::clone(&self.voice);
        let controller = Arc::clone(&self.controller);
        self.renderer.set_echo_user(true);
        let result = self
            .drive(voice.listen(), || {
                // The dictation prompt handles its own Ctrl-C; here it stops the reply
                if !voice.stop() {
                    controller.cancel();
                }
            })
            .await;
        self.renderer.set_echo_user(false);

        match result {
            Ok(VoiceOutcome::Ended) => {
                println!("{}", ConsoleFormatter::format_info("Listening stopped."));
            }
            Ok(outcome) => debug!("Voice session finished: {:?}", outcome),
            Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
        self.refresh_if_needed().await;
    }

    /// Run `work` to completion while rendering events as they arrive.
    /// Ctrl-C calls `interrupt` instead of ending the process.
    async fn drive<F: Future>(&mut self, work: F, interrupt: impl Fn()) -> F::Output {
        tokio::pin!(work);
        let mut stdout = io::stdout();

        let output = loop {
            tokio::select! {
                output = &mut work => break output,
                Some(event) = self.events.recv() => self.show(event, &mut stdout),
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => interrupt(),
                    Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
                },
            }
        };

        while let Ok(event) = self.events.try_recv() {
            self.show(event, &mut stdout);
        }
        output
    }

    fn show(&mut self, event: UiEvent, out: &mut impl Write) {
        if let Err(e) = self.renderer.render(event, out) {
            debug!("Failed to write event: {}", e);
        }
    }

    async fn refresh_if_needed(&mut self) {
        if self.renderer.take_refresh() {
            self.print_list().await;
        }
    }

    async fn print_list(&self) {
        match self.list.list().await {
            Ok(items) => print!("{}", ConsoleFormatter::format_items(&items)),
            Err(e) => println!(
                "{}",
                ConsoleFormatter::format_error(&format!("Could not load the list: {e}"))
            ),
        }
    }

    async fn add_item(&self, description: &str) {
        let item = match NewGroceryItem::new(description) {
            Ok(item) => item,
            Err(e) => {
                println!("{}", ConsoleFormatter::format_error(&e.to_string()));
                return;
            }
        };
        match self.list.add(&item).await {
            Ok(added) => {
                println!(
                    "{}",
                    ConsoleFormatter::format_info(&format!(
                        "Added {} ({})",
                        added.description, added.id
                    ))
                );
                self.print_list().await;
            }
            Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
    }

    async fn set_checked(&self, id: i64, checked: bool) {
        match self.list.set_checked(id, checked).await {
            Ok(_) => self.print_list().await,
            Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("grocery-chat").join("history.txt"))
}
