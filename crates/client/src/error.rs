//! Transport-level errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status. `error` is the body's `error` field when present.
    #[error("API error ({status}): {}", .error.as_deref().unwrap_or("<no error message>"))]
    Api { status: u16, error: Option<String> },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Server-supplied message, if the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
