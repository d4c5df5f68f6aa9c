//! CLI entrypoint for grocery-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use grocery_application::{
    ChatUseCase, ConversationController, ConversationLogger, GroceryListPort,
    NoConversationLogger, VoiceCaptureUseCase,
};
use grocery_domain::Language;
use grocery_infrastructure::{
    ConfigLoader, FileConfig, HttpChatGateway, HttpGroceryList, JsonlConversationLogger,
    build_client,
};
use grocery_presentation::{ChatRepl, Cli, DictationRecognizer};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Kept alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting grocery-chat");

    let config = load_config(&cli)?;
    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let base_url = config.api.normalized_base_url().to_string();
    let client = build_client(config.api.timeout()).context("Failed to create HTTP client")?;
    let gateway = Arc::new(HttpChatGateway::new(client.clone(), &base_url));
    let list: Arc<dyn GroceryListPort> = Arc::new(HttpGroceryList::new(client, &base_url));
    let logger = conversation_logger(&config);

    let (tx, rx) = mpsc::unbounded_channel();
    let chat = ChatUseCase::new(gateway, config.to_chat_config());
    let controller = Arc::new(
        ConversationController::new(chat)
            .with_event_sender(tx.clone())
            .with_conversation_logger(Arc::clone(&logger)),
    );
    let voice = Arc::new(
        VoiceCaptureUseCase::new(
            Arc::new(DictationRecognizer::new()),
            Arc::clone(&controller),
            config.voice.to_voice_config(),
        )
        .with_event_sender(tx)
        .with_conversation_logger(logger),
    );

    let mut repl = ChatRepl::new(controller, voice, list, rx, base_url)
        .with_progress(!cli.quiet && config.output.show_progress);

    // Single message mode
    if let Some(message) = &cli.message {
        if !repl.run_once(message).await {
            bail!("The assistant did not complete the reply");
        }
        return Ok(());
    }

    repl.run().await?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = &cli.log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    builder.with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // CLI flags take precedence over every file and environment source
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(language) = &cli.language {
        let language: Language = language
            .parse()
            .with_context(|| format!("Invalid --language: {language}"))?;
        config.voice.language = language.to_string();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(dir) = &config.log.conversation_dir else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::in_dir(dir) {
        Some(logger) => {
            info!("Recording conversation to {}", logger.path().display());
            Arc::new(logger)
        }
        None => {
            warn!("Conversation log disabled: cannot write to {}", dir.display());
            Arc::new(NoConversationLogger)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_flag_is_normalized() {
        let cli = Cli::parse_from(["grocery-chat", "--no-config", "--language", "pt_br"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.voice.language, "pt-BR");
    }

    #[test]
    fn test_unknown_language_flag_is_rejected() {
        let cli = Cli::parse_from(["grocery-chat", "--no-config", "-l", "fr-FR"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("fr-FR"));
    }

    #[test]
    fn test_api_url_flag_overrides_defaults() {
        let cli = Cli::parse_from(["grocery-chat", "--no-config", "--api-url", "http://backend:9000/"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api.normalized_base_url(), "http://backend:9000");
    }
}
