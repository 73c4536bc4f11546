use thiserror::Error;

use crate::value::Kind;

pub type Result<T> = core::result::Result<T, Error>;

/// A structured SQL error reported by the server during a prepare or execute
/// response, decoded per the five-field layout in the session protocol.
#[derive(Debug, Clone, Error)]
#[error("{code_name} ({code_numeric}): {message}")]
pub struct ServerSqlError {
    pub code_name: String,
    pub message: String,
    pub sql: String,
    pub code_numeric: i32,
    pub trace: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("server error: {0}")]
    Server(#[from] ServerSqlError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("handshake failed: server returned status {0}")]
    Handshake(i32),

    #[error("expected {expected} parameters, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    #[error("unsupported value kind: {0:?}")]
    UnsupportedValue(Kind),

    #[error("unknown value kind tag: {0}")]
    UnknownValueKind(i32),

    #[error("bad config: {0}")]
    Config(String),

    #[error("bad config url: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// True for failures after which the Transport's framing can no longer
    /// be trusted and the connection must be closed rather than reused.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Handshake(_) | Error::UnknownValueKind(_))
    }
}
