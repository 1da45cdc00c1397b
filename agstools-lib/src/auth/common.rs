//! Token payload parsing

use chrono::DateTime;
use serde::Deserialize;

use super::Token;
use crate::error::ArcGisErrorDetail;
use crate::error::AuthError;
use crate::error::Error;
use crate::error::ProtocolError;
use crate::response::error_detail;

/// Token response from `generateToken`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
    /// Expiry as epoch milliseconds.
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub ssl: bool,
}

impl TokenResponse {
    pub fn into_token(self) -> Token {
        let token = match self.expires.and_then(DateTime::from_timestamp_millis) {
            Some(expires_at) => Token::with_expiry(self.token, expires_at),
            None => Token::new(self.token),
        };
        token.ssl_only(self.ssl)
    }
}

/// Decodes a `generateToken` body.
pub(crate) fn decode_token_body(body: &str) -> Result<Token, Error> {
    if let Some(detail) = error_detail(body) {
        return Err(Error::Authentication(map_error_response(detail)));
    }

    let response: TokenResponse = serde_json::from_str(body).map_err(|e| {
        ProtocolError::with_body(format!("response is not a token payload: {}", e), body)
    })?;

    if response.token.is_empty() {
        return Err(ProtocolError::with_body("token service returned an empty token", body).into());
    }

    Ok(response.into_token())
}

/// Maps a token service error payload to an [`AuthError`].
pub(crate) fn map_error_response(detail: ArcGisErrorDetail) -> AuthError {
    if detail.mentions("invalid username or password") || detail.mentions("invalid credentials") {
        AuthError::InvalidCredentials
    } else {
        AuthError::Rejected {
            code: detail.code,
            message: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_token() {
        let body = json!({"token": "abc123", "expires": 1767225600000i64, "ssl": true});
        let token = decode_token_body(&body.to_string()).unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert_eq!(
            token.expires_at(),
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(token.is_ssl_only());
    }

    #[test]
    fn test_decode_token_without_expiry() {
        let token = decode_token_body(r#"{"token": "abc123"}"#).unwrap();
        assert!(token.expires_at().is_none());
        assert!(!token.is_ssl_only());
    }

    #[test]
    fn test_invalid_credentials() {
        let body = json!({"error": {
            "code": 400,
            "message": "Unable to generate token.",
            "details": ["Invalid username or password."]
        }});
        let err = decode_token_body(&body.to_string()).unwrap_err();
        assert!(matches!(
            err,
            Error::Authentication(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_other_rejections() {
        let body = json!({"error": {
            "code": 400,
            "message": "Unable to generate token.",
            "details": ["'referer' must be specified."]
        }});
        let err = decode_token_body(&body.to_string()).unwrap_err();
        assert!(matches!(
            err,
            Error::Authentication(AuthError::Rejected { code: 400, .. })
        ));
    }

    #[test]
    fn test_unparseable_payloads() {
        assert!(decode_token_body("<html></html>").unwrap_err().is_protocol());
        assert!(decode_token_body(r#"{"expires": 1}"#).unwrap_err().is_protocol());
        assert!(decode_token_body(r#"{"token": ""}"#).unwrap_err().is_protocol());
    }
}
