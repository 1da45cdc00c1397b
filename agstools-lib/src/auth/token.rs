//! Token type

use chrono::DateTime;
use chrono::Utc;

/// A bearer token issued by an ArcGIS token service.
///
/// The token value is opaque. The expiry is whatever the server reported and
/// is only used for the convenience checks below; the server remains the
/// authority on whether a token is still valid.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    expires_at: Option<DateTime<Utc>>,
    ssl: bool,
}

impl Token {
    /// Creates a token from a raw string with no known expiry.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
            ssl: false,
        }
    }

    /// Creates a token with an expiration time.
    pub fn with_expiry(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
            ssl: false,
        }
    }

    /// Marks whether the server requires the token to be sent over HTTPS only.
    pub fn ssl_only(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Returns the raw token string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns when the token expires, if known.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the server flagged the token as HTTPS-only.
    pub fn is_ssl_only(&self) -> bool {
        self.ssl
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns `true` if the token will expire within the given duration.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn expires_within(&self, duration: chrono::Duration) -> bool {
        self.expires_at
            .is_some_and(|exp| Utc::now() + duration >= exp)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("ssl", &self.ssl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_expiry_checks() {
        let token = Token::new("abc");
        assert!(!token.is_expired());
        assert!(!token.expires_within(Duration::minutes(5)));

        let expired = Token::with_expiry("abc", Utc::now() - Duration::minutes(1));
        assert!(expired.is_expired());

        let soon = Token::with_expiry("abc", Utc::now() + Duration::minutes(2));
        assert!(!soon.is_expired());
        assert!(soon.expires_within(Duration::minutes(5)));
        assert!(!soon.expires_within(Duration::seconds(10)));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = Token::new("super-secret").ssl_only(true);
        let debug = format!("{:?}", token);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
        assert!(token.is_ssl_only());
        assert_eq!(token.as_str(), "super-secret");
    }
}
