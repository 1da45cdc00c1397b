//! Protocol error type

/// A response that could not be parsed into the expected payload.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProtocolError {
    /// Description of the parse failure.
    pub message: String,
    /// Raw response body, if available.
    pub body: Option<String>,
}

impl ProtocolError {
    /// Creates a new protocol error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new protocol error carrying the raw response body.
    pub fn with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: Some(body.into()),
        }
    }
}
