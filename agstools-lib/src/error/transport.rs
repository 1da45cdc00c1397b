//! Transport error types

/// Errors raised while talking to the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, connect, TLS handshake, timeout or body read failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status without an ArcGIS error payload.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl TransportError {
    /// Creates a new status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(err) if err.is_timeout())
    }
}
