use std::env;
use std::time::Duration;
use tracing::warn;

/// Runtime configuration, read from the environment at startup. Every
/// field has a default so the relay runs with no configuration at all.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bind address for the HTTP/WebSocket listener.
    pub host: String,
    pub port: u16,
    /// How long a fresh connection may sit in the join phase before it
    /// is closed.
    pub join_timeout: Duration,
    /// Candidates that must be relayed in each direction before a pair
    /// is considered connected.
    pub min_candidate_exchanges: u32,
    /// Room assigned to sessions whose join frame names none.
    pub default_room: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            join_timeout: Duration::from_secs(30),
            min_candidate_exchanges: 1,
            default_room: "lobby".into(),
        }
    }
}

impl RelayConfig {
    /// Reads `HOST`, `PORT`, `JOIN_TIMEOUT_MS`, `MIN_CANDIDATE_EXCHANGES`
    /// and `DEFAULT_ROOM`. Unparseable values fall back to the default
    /// with a warning rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var("PORT") {
            config.port = port;
        }
        if let Some(ms) = parse_var("JOIN_TIMEOUT_MS") {
            config.join_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var("MIN_CANDIDATE_EXCHANGES") {
            config.min_candidate_exchanges = n;
        }
        if let Ok(room) = env::var("DEFAULT_ROOM") {
            if !room.trim().is_empty() {
                config.default_room = room;
            }
        }
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(var = name, value, "unparseable value, using default");
            None
        }
    }
}
