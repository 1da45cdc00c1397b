//! Authenticator configuration

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::transport::parse_endpoint;

/// Default token lifetime requested from the server, in minutes.
const DEFAULT_EXPIRATION_MINUTES: u32 = 60;

/// How the token service should bind the issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientType {
    /// Bind the token to the caller's IP address.
    RequestIp,
    /// Bind the token to an HTTP referer, which must be sent with every request.
    Referer(String),
}

impl ClientType {
    fn as_param(&self) -> &'static str {
        match self {
            Self::RequestIp => "requestip",
            Self::Referer(_) => "referer",
        }
    }
}

/// Validated settings for obtaining a token.
///
/// Built with [`AuthConfig::builder`]; every field is checked once at
/// construction and the struct is immutable afterwards.
///
/// # Example
///
/// ```
/// use agstools_lib::auth::AuthConfig;
///
/// let config = AuthConfig::builder()
///     .token_url("https://gis.example.com/arcgis/tokens/generateToken")
///     .username("editor")
///     .password("secret")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.username(), "editor");
/// ```
#[derive(Clone)]
pub struct AuthConfig {
    token_url: Url,
    username: String,
    password: String,
    certificate: Option<PathBuf>,
    client: ClientType,
    expiration_minutes: u32,
    timeout: Option<Duration>,
}

impl AuthConfig {
    /// Creates a new builder.
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Returns the trust bundle path, if any.
    pub fn certificate(&self) -> Option<&Path> {
        self.certificate.as_deref()
    }

    /// Returns the client binding.
    pub fn client(&self) -> &ClientType {
        &self.client
    }

    /// Returns the requested token lifetime in minutes.
    pub fn expiration_minutes(&self) -> u32 {
        self.expiration_minutes
    }

    /// Returns the request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Form parameters sent to the token endpoint.
    pub(crate) fn form_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("client", self.client.as_param().to_string()),
            ("expiration", self.expiration_minutes.to_string()),
            ("f", "json".to_string()),
        ];

        if let ClientType::Referer(referer) = &self.client {
            params.push(("referer", referer.clone()));
        }

        params
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_url", &self.token_url.as_str())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("certificate", &self.certificate)
            .field("client", &self.client)
            .field("expiration_minutes", &self.expiration_minutes)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`AuthConfig`].
#[derive(Default)]
pub struct AuthConfigBuilder {
    token_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    certificate: Option<PathBuf>,
    referer: Option<String>,
    expiration_minutes: Option<u32>,
    timeout: Option<Duration>,
}

impl AuthConfigBuilder {
    /// Sets the token endpoint, e.g. `https://host/arcgis/tokens/generateToken`.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets a PEM trust bundle used to verify the token server.
    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    /// Binds the token to a referer instead of the caller's IP address.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Sets the requested token lifetime in minutes.
    ///
    /// Defaults to 60. The server may cap it.
    pub fn expiration_minutes(mut self, minutes: u32) -> Self {
        self.expiration_minutes = Some(minutes);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates the settings and builds the [`AuthConfig`].
    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let raw_url = self.token_url.ok_or(ConfigError::Missing("token_url"))?;
        let token_url = parse_endpoint(&raw_url)?;

        let username = non_empty(self.username, "username")?;
        let password = non_empty(self.password, "password")?;

        if let Some(path) = &self.certificate {
            if !path.is_file() {
                return Err(ConfigError::CertificateRead {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "certificate file does not exist",
                    ),
                });
            }
        }

        let client = match self.referer {
            Some(referer) if !referer.trim().is_empty() => ClientType::Referer(referer),
            Some(_) => return Err(ConfigError::Missing("referer")),
            None => ClientType::RequestIp,
        };

        let expiration_minutes = self.expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES);
        if expiration_minutes == 0 {
            return Err(ConfigError::InvalidExpiration(expiration_minutes));
        }

        Ok(AuthConfig {
            token_url,
            username,
            password,
            certificate: self.certificate,
            client,
            expiration_minutes,
            timeout: self.timeout,
        })
    }
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
