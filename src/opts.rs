use std::time::Duration;

use crate::error::Error;

/// Level recorded from the DSN's `logging` key. This crate never installs a
/// subscriber itself; the embedding application reads this to decide how (or
/// whether) to configure one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    None,
    Error,
    Warn,
    Debug,
    Info,
    Trace,
    Panic,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(LogLevel::None),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "trace" => Some(LogLevel::Trace),
            "panic" => Some(LogLevel::Panic),
            _ => None,
        }
    }
}

/// A parsed `h2://` DSN, ready to be handed to [`crate::client::Client::connect`].
///
/// ```rs
/// let info = ConnectionInfo::try_from("h2://sa:sa@localhost/mem:test?mem=true")?;
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Enable `TCP_NODELAY` to disable Nagle's algorithm.
    pub tcp_nodelay: bool,

    /// Socket connect timeout; `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,

    /// Hostname or IP address of the server.
    pub host: String,

    /// TCP port the server is listening on.
    pub port: u16,

    /// Database path, with any `mem:` prefix already applied.
    pub database: String,

    /// Username for authentication.
    pub user: String,

    pub password: String,

    /// Requested log level from the `logging` DSN key; observation only.
    pub log_level: LogLevel,
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self {
            tcp_nodelay: true,
            connect_timeout: None,
            host: "127.0.0.1".to_string(),
            port: crate::constant::DEFAULT_PORT,
            database: "~/test".to_string(),
            user: String::new(),
            password: String::new(),
            log_level: LogLevel::None,
        }
    }
}

impl TryFrom<&str> for ConnectionInfo {
    type Error = Error;

    fn try_from(dsn: &str) -> Result<Self, Self::Error> {
        let parsed = url::Url::parse(dsn)?;

        if parsed.scheme() != "h2" {
            return Err(Error::Config(format!(
                "invalid DSN scheme '{}', expected 'h2'",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .unwrap_or("127.0.0.1")
            .to_string();
        let port = parsed.port().unwrap_or(crate::constant::DEFAULT_PORT);
        let user = parsed.username().to_string();
        let password = parsed.password().unwrap_or_default().to_string();

        let mut database = parsed
            .path()
            .strip_prefix('/')
            .unwrap_or_default()
            .to_string();
        if database.is_empty() {
            database = "~/test".to_string();
        }

        let mut log_level = LogLevel::None;
        let mut mem = false;

        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "mem" => {
                    mem = matches!(value.to_ascii_lowercase().as_str(), "" | "1" | "yes" | "true");
                }
                "logging" => {
                    log_level = LogLevel::parse(&value)
                        .ok_or_else(|| Error::Config(format!("unknown logging level '{value}'")))?;
                }
                other => {
                    return Err(Error::Config(format!("unknown DSN key '{other}'")));
                }
            }
        }

        if mem {
            let stripped = database.strip_prefix('/').unwrap_or(&database).to_string();
            database = format!("mem:{stripped}");
        }

        Ok(Self {
            tcp_nodelay: true,
            connect_timeout: None,
            host,
            port,
            database,
            user,
            password,
            log_level,
        })
    }
}
