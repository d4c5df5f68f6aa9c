//! Interactive chat module
//!
//! Provides a line-editor based chat interface: plain lines go to the
//! assistant, `/` commands manage the list and voice input.

mod command;
mod renderer;
mod repl;

pub use command::ReplCommand;
pub use renderer::EventRenderer;
pub use repl::ChatRepl;
