/// Command list returned by `/help`, sent to the requester only.
pub const HELP_TEXT: &str = "available commands:\n\
    /msg <user> <text>  send a private message\n\
    /w <user> <text>    alias for /msg\n\
    /global <text>      send to everyone on the server\n\
    /help               show this list\n\
    anything else is sent to your current room";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ChatCommand {
    Private { to: String, text: String },
    Global { text: String },
    Help,
    /// No recognized prefix; scope comes from the frame (room default).
    Plain(String),
    /// Recognized prefix with missing arguments.
    Invalid(String),
}

/// Parses the command grammar out of a message body. Unrecognized
/// slash-prefixed bodies are treated as plain text, not errors.
pub fn parse_command(body: &str) -> ChatCommand {
    let trimmed = body.trim();
    if trimmed == "/help" {
        return ChatCommand::Help;
    }
    for prefix in ["/msg ", "/w "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let mut parts = rest.trim_start().splitn(2, char::is_whitespace);
            let to = parts.next().unwrap_or("").to_string();
            let text = parts.next().unwrap_or("").trim().to_string();
            if to.is_empty() || text.is_empty() {
                return ChatCommand::Invalid(format!("usage: {prefix}<user> <text>"));
            }
            return ChatCommand::Private { to, text };
        }
    }
    if let Some(rest) = trimmed.strip_prefix("/global ") {
        let text = rest.trim().to_string();
        if text.is_empty() {
            return ChatCommand::Invalid("usage: /global <text>".into());
        }
        return ChatCommand::Global { text };
    }
    if trimmed == "/global" || trimmed == "/msg" || trimmed == "/w" {
        return ChatCommand::Invalid(format!("{trimmed} needs arguments"));
    }
    ChatCommand::Plain(body.to_string())
}
