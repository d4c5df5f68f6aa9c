//! REPL input parsing

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text for the assistant
    Chat(String),
    List,
    Add(String),
    Remove(i64),
    Check(i64),
    Uncheck(i64),
    Voice,
    /// Show (`None`) or switch the recognition language
    Language(Option<String>),
    History,
    Health,
    Help,
    Quit,
    /// Known command with bad arguments
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(ReplCommand::Chat(line.to_string()));
        };

        let (name, args) = match command.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (command, ""),
        };

        let parsed = match name {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "list" | "ls" => ReplCommand::List,
            "add" if args.is_empty() => ReplCommand::Usage("/add <item>"),
            "add" => ReplCommand::Add(args.to_string()),
            "remove" | "rm" => Self::with_id(args, ReplCommand::Remove, "/remove <id>"),
            "check" => Self::with_id(args, ReplCommand::Check, "/check <id>"),
            "uncheck" => Self::with_id(args, ReplCommand::Uncheck, "/uncheck <id>"),
            "voice" | "v" => ReplCommand::Voice,
            "lang" | "language" if args.is_empty() => ReplCommand::Language(None),
            "lang" | "language" => ReplCommand::Language(Some(args.to_string())),
            "history" => ReplCommand::History,
            "health" => ReplCommand::Health,
            _ => ReplCommand::Unknown(format!("/{name}")),
        };
        Some(parsed)
    }

    fn with_id(args: &str, make: fn(i64) -> ReplCommand, usage: &'static str) -> ReplCommand {
        match args.parse() {
            Ok(id) => make(id),
            Err(_) => ReplCommand::Usage(usage),
        }
    }
}
