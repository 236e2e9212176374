//! Session Error Types
//!
//! Error taxonomy for the session core. Config errors abort startup; remote
//! errors are recoverable and leave the stored session window untouched until
//! a later attempt succeeds.

use thiserror::Error;

/// Session-core errors
#[derive(Error, Debug)]
pub enum SessionError {
    // Configuration errors (fatal at startup)
    #[error("Config error: {0}")]
    Config(String),

    // Remote errors (recoverable)
    #[error("Backend unreachable: {0}")]
    RemoteUnavailable(String),

    #[error("Backend rejected request: HTTP {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    // Local errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            SessionError::RemoteUnavailable(err.to_string())
        } else if err.is_decode() {
            SessionError::MalformedResponse(err.to_string())
        } else {
            SessionError::RemoteUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for session-core operations
pub type Result<T> = std::result::Result<T, SessionError>;
