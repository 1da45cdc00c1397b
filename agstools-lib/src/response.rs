//! Response decoding for ArcGIS REST endpoints
//!
//! Every endpoint answers in the same envelope: the payload on success, or an
//! `{"error": {...}}` object (usually with HTTP 200) on failure. The helpers
//! here turn a raw response into either the payload or a typed [`Error`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ArcGisErrorDetail;
use crate::error::AuthError;
use crate::error::Error;
use crate::error::ProtocolError;
use crate::error::TransportError;

/// ArcGIS error code for an invalid or expired token.
pub(crate) const INVALID_TOKEN: i64 = 498;
/// ArcGIS error code for a missing token.
pub(crate) const TOKEN_REQUIRED: i64 = 499;
const UNAUTHORIZED: i64 = 401;
const FORBIDDEN: i64 = 403;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ArcGisErrorDetail,
}

/// Reads the body of a layer endpoint response.
///
/// Non-success statuses are mapped here; success bodies are returned as text
/// for [`decode_layer_body`].
pub(crate) async fn read_layer_response(response: reqwest::Response) -> Result<String, Error> {
    let status = response.status();
    let body = response.text().await.map_err(TransportError::Network)?;

    if status.is_success() {
        return Ok(body);
    }

    debug!(status = status.as_u16(), "layer endpoint returned non-success status");
    Err(status_error(status.as_u16(), body))
}

/// Decodes a layer endpoint body into `T`, mapping ArcGIS error payloads.
pub(crate) fn decode_layer_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ProtocolError::with_body(format!("response is not valid JSON: {}", e), body)
    })?;

    if value.get("error").is_some() {
        let envelope: ErrorEnvelope = serde_json::from_value(value).map_err(|e| {
            ProtocolError::with_body(format!("malformed error payload: {}", e), body)
        })?;
        return Err(map_layer_error(envelope.error));
    }

    serde_json::from_value(value).map_err(|e| {
        Error::Protocol(ProtocolError::with_body(
            format!("unexpected response shape: {}", e),
            body,
        ))
    })
}

/// Extracts an ArcGIS error payload from a body, if it is one.
pub(crate) fn error_detail(body: &str) -> Option<ArcGisErrorDetail> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}

/// Maps a layer error payload to the failure stage it belongs to.
pub(crate) fn map_layer_error(detail: ArcGisErrorDetail) -> Error {
    match detail.code {
        INVALID_TOKEN => Error::Authentication(AuthError::InvalidToken {
            message: detail.message,
        }),
        TOKEN_REQUIRED => Error::Authentication(AuthError::TokenRequired),
        UNAUTHORIZED | FORBIDDEN => Error::Authentication(AuthError::Forbidden {
            status: detail.code as u16,
        }),
        _ => Error::Query(detail),
    }
}

/// Maps a non-success HTTP status.
///
/// The status decides the failure stage. An ArcGIS payload only refines a
/// 401/403 into a token error.
pub(crate) fn status_error(status: u16, body: String) -> Error {
    match status {
        401 | 403 => match error_detail(&body) {
            Some(detail) if matches!(detail.code, INVALID_TOKEN | TOKEN_REQUIRED) => {
                map_layer_error(detail)
            }
            _ => Error::Authentication(AuthError::Forbidden { status }),
        },
        _ => Error::Transport(TransportError::status(status, body)),
    }
}
