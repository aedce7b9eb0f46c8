mod identity;
mod registry;
mod session;

pub use identity::claim;
pub use registry::Registry;
pub use session::Session;
