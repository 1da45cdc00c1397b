//! Authentication error types

/// Errors raised when the server refuses credentials or a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid username or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The token service refused to issue a token for another reason.
    #[error("Token request rejected ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// The endpoint requires a token and none was accepted (ArcGIS code 499).
    #[error("Token required")]
    TokenRequired,

    /// The token is invalid or has expired (ArcGIS code 498).
    #[error("Invalid or expired token: {message}")]
    InvalidToken { message: String },

    /// The server denied access to the resource.
    #[error("Access denied (status {status})")]
    Forbidden { status: u16 },
}

impl AuthError {
    /// Returns `true` if a fresh token could resolve this error.
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::TokenRequired | Self::InvalidToken { .. })
    }
}
