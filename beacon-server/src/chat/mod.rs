mod chat_command;
mod chat_router;

pub use chat_command::{ChatCommand, HELP_TEXT, parse_command};
pub use chat_router::{ChatRouter, DeliveryResult};
