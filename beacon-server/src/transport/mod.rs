mod event_sink;
mod session_sink;
mod ws_handler;

pub use event_sink::EventSink;
pub use session_sink::SessionSink;
pub use ws_handler::ws_handler;
