//! Error types
//!
//! Every failure surfaces as an [`Error`], with one variant per stage of an
//! operation so callers can branch on the kind of failure.

mod arcgis;
mod auth;
mod config;
mod field;
mod protocol;
mod transport;

pub use arcgis::*;
pub use auth::*;
pub use config::*;
pub use field::*;
pub use protocol::*;
pub use transport::*;

/// The error type returned by all client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials were rejected or the token is missing, invalid or expired.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// The request could not be completed or the server answered with a
    /// non-success HTTP status.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response could not be understood.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server rejected the query or edit parameters.
    #[error("Query rejected: {0}")]
    Query(ArcGisErrorDetail),

    /// Invalid client or authenticator configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A feature attribute was missing or had an unexpected type.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// Returns `true` if this is an authentication failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns `true` if this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a protocol failure.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns `true` if the server rejected the query parameters.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the ArcGIS error detail, if the server reported one.
    pub fn arcgis_detail(&self) -> Option<&ArcGisErrorDetail> {
        match self {
            Self::Query(detail) => Some(detail),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(TransportError::Network(err))
    }
}
