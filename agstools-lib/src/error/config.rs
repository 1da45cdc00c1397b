//! Configuration error types

use std::path::PathBuf;

/// Errors raised while validating configuration, before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The URL could not be parsed or is not an http(s) URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A required setting is missing or empty.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// The certificate file could not be read.
    #[error("Failed to read certificate {path}: {source}")]
    CertificateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The certificate file does not contain a usable PEM bundle.
    #[error("Invalid certificate {path}: {message}")]
    CertificateParse { path: PathBuf, message: String },

    /// The requested page size is not a positive number.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),

    /// The requested token lifetime is not a positive number of minutes.
    #[error("Invalid token expiration: {0} minutes")]
    InvalidExpiration(u32),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Creates a new invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
