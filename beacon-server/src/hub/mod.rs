mod hub;
mod hub_command;

pub use hub::Hub;
pub use hub_command::HubCommand;
