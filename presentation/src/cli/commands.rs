//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for grocery-chat
#[derive(Parser, Debug)]
#[command(name = "grocery-chat")]
#[command(author, version, about = "Chat with your grocery list assistant")]
#[command(long_about = r#"
grocery-chat talks to the grocery list backend. Ask the assistant to add,
remove or check items in plain language and watch the reply stream in.

Without a MESSAGE an interactive session starts. Lines are sent to the
assistant; lines starting with '/' are commands (try /help). Press Ctrl-C
while a reply is streaming to stop it.

Configuration files are loaded from (in priority order):
1. GROCERY_API_URL / GROCERY_CHAT_*      Environment
2. --config <path>                       Explicit config file
3. ./grocery-chat.toml                   Project-level config
4. ~/.config/grocery-chat/config.toml    Global config

Example:
  grocery-chat "add milk and eggs"
  grocery-chat --api-url http://localhost:8000
  grocery-chat --language pt-BR
"#)]
pub struct Cli {
    /// Send one message and exit (interactive mode when omitted)
    pub message: Option<String>,

    /// Backend base URL (overrides configuration)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Speech recognition language (en-US or pt-BR)
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
