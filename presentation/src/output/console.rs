//! Console output formatting for the grocery list and conversation

use colored::Colorize;
use grocery_domain::grocery::checked_count;
use grocery_domain::{
    ConversationTurn, GroceryItem, Language, NoticeSeverity, RecognitionNotice, Sender,
};

/// Formats list and conversation data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The grocery list with checkboxes and ids.
    pub fn format_items(items: &[GroceryItem]) -> String {
        if items.is_empty() {
            return format!("{}\n", "Your grocery list is empty.".dimmed());
        }

        let mut output = format!(
            "{} {}\n",
            "Grocery list".cyan().bold(),
            format!("({}/{} checked)", checked_count(items), items.len()).dimmed()
        );
        let width = items
            .iter()
            .map(|item| item.id.to_string().len())
            .max()
            .unwrap_or(1);

        for item in items {
            let id = format!("{:>width$}", item.id);
            if item.checked {
                output.push_str(&format!(
                    "  {} {}  {}\n",
                    "[x]".green(),
                    id.dimmed(),
                    item.description.strikethrough().dimmed()
                ));
            } else {
                output.push_str(&format!("  [ ] {}  {}\n", id.dimmed(), item.description));
            }
        }
        output
    }

    /// Speaker label printed before a turn.
    pub fn speaker(sender: Sender) -> String {
        match sender {
            Sender::User => "You:".bold().to_string(),
            Sender::Assistant => "Assistant:".green().bold().to_string(),
        }
    }

    /// Full transcript for `/history`.
    pub fn format_history(turns: &[ConversationTurn]) -> String {
        if turns.is_empty() {
            return format!("{}\n", "No messages yet.".dimmed());
        }

        let mut output = String::new();
        for turn in turns {
            let time = turn.created_at().format("%H:%M:%S").to_string();
            let text = if turn.is_pending() {
                "…".dimmed().to_string()
            } else {
                turn.text().to_string()
            };
            output.push_str(&format!(
                "{} {} {}\n",
                time.dimmed(),
                Self::speaker(turn.sender()),
                text
            ));
        }
        output
    }

    pub fn format_notice(notice: &RecognitionNotice) -> String {
        match notice.severity {
            NoticeSeverity::Warning => format!("{} {}", "!".yellow().bold(), notice.message.yellow()),
            NoticeSeverity::Error => format!("{} {}", "x".red().bold(), notice.message.red()),
        }
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn format_info(message: &str) -> String {
        format!("{} {}", "->".cyan(), message)
    }

    pub fn format_languages(current: Language) -> String {
        let mut output = String::from("Voice languages:\n");
        for language in Language::all() {
            let marker = if *language == current { "*" } else { " " };
            output.push_str(&format!("  {} {}\n", marker.green(), language));
        }
        output
    }

    pub fn welcome(api_url: &str, language: Language) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str("╭─────────────────────────────────────────────╮\n");
        output.push_str("│          Grocery Chat - Assistant           │\n");
        output.push_str("╰─────────────────────────────────────────────╯\n");
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Backend:".cyan().bold(), api_url));
        output.push_str(&format!("{} {}\n", "Voice:".cyan().bold(), language));
        output.push('\n');
        output.push_str(&Self::help());
        output
    }

    pub fn help() -> String {
        [
            "Commands:",
            "  /list              - Show the grocery list",
            "  /add <item>        - Add an item",
            "  /remove <id>       - Remove an item",
            "  /check <id>        - Mark an item as bought",
            "  /uncheck <id>      - Unmark an item",
            "  /voice             - Dictate a message",
            "  /lang [en-US|pt-BR] - Show or set the voice language",
            "  /history           - Show this conversation",
            "  /health            - Check the backend",
            "  /help              - Show this help",
            "  /quit              - Exit",
            "",
            "Anything else is sent to the assistant. Ctrl-C stops a streaming reply.",
            "",
        ]
        .join("\n")
    }
}
