//! Token generation against an ArcGIS `generateToken` endpoint

use std::path::Path;

use tracing::debug;

use super::common::decode_token_body;
use super::common::map_error_response;
use super::AuthConfig;
use super::Token;
use crate::error::AuthError;
use crate::error::Error;
use crate::error::TransportError;
use crate::response::error_detail;
use crate::transport::build_http_client;

/// Exchanges username/password credentials for a [`Token`].
///
/// The HTTP client is built once from the configuration (including the
/// optional trust bundle) and reused for every call. No retries are made.
///
/// # Example
///
/// ```ignore
/// use agstools_lib::auth::{AuthConfig, Authenticator};
///
/// let config = AuthConfig::builder()
///     .token_url("https://gis.example.com/arcgis/tokens/generateToken")
///     .username("editor")
///     .password("secret")
///     .certificate("/etc/ssl/gis-ca.pem")
///     .build()?;
///
/// let token = Authenticator::new(config)?.get_token().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
    http_client: reqwest::Client,
}

impl Authenticator {
    /// Creates an authenticator, loading the configured trust bundle.
    pub fn new(config: AuthConfig) -> Result<Self, Error> {
        let http_client = build_http_client(config.certificate(), None)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Creates an authenticator with a caller-supplied HTTP client.
    ///
    /// The configured certificate is ignored; the client is used as-is.
    pub fn with_http_client(config: AuthConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Requests a new token.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if the server rejects the credentials
    /// - [`Error::Transport`] if the request cannot be completed
    /// - [`Error::Protocol`] if the response is not a token payload
    pub async fn get_token(&self) -> Result<Token, Error> {
        let url = self.config.token_url().clone();
        debug!(url = %url, username = self.config.username(), "requesting token");

        let mut request = self
            .http_client
            .post(url)
            .form(&self.config.form_params());

        if let Some(timeout) = self.config.timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(TransportError::Network)?;
        let status = response.status();
        let body = response.text().await.map_err(TransportError::Network)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "token endpoint returned non-success status");
            return Err(match status.as_u16() {
                401 | 403 => Error::Authentication(
                    error_detail(&body).map_or(AuthError::InvalidCredentials, map_error_response),
                ),
                code => Error::Transport(TransportError::status(code, body)),
            });
        }

        let token = decode_token_body(&body)?;
        debug!(expires_at = ?token.expires_at(), "token issued");
        Ok(token)
    }
}

/// Obtains a token in one call.
///
/// Convenience wrapper around [`AuthConfig`] and [`Authenticator`].
///
/// # Example
///
/// ```ignore
/// let token = agstools_lib::auth::get_token(
///     "https://gis.example.com/arcgis/tokens/generateToken",
///     "editor",
///     "secret",
///     None,
/// )
/// .await?;
/// ```
pub async fn get_token(
    token_url: &str,
    username: &str,
    password: &str,
    certificate: Option<&Path>,
) -> Result<Token, Error> {
    let mut builder = AuthConfig::builder()
        .token_url(token_url)
        .username(username)
        .password(password);

    if let Some(path) = certificate {
        builder = builder.certificate(path);
    }

    Authenticator::new(builder.build()?)?.get_token().await
}
