//! Main FeatureLayerClient

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::auth::Token;
use crate::error::ConfigError;
use crate::error::Error;
use crate::error::TransportError;
use crate::response::read_layer_response;
use crate::transport::build_http_client;
use crate::transport::parse_endpoint;

/// Client for a single ArcGIS feature/map layer.
///
/// Bound at construction to a layer URL, a [`Token`] and an optional trust
/// bundle; none of these change afterwards. The client is cheap to clone
/// (uses `Arc` internally). Every operation issues its requests strictly one
/// after another.
///
/// # Example
///
/// ```ignore
/// use agstools_lib::FeatureLayerClient;
///
/// let client = FeatureLayerClient::builder()
///     .url("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0")
///     .token(token)
///     .certificate("/etc/ssl/gis-ca.pem")
///     .build()?;
///
/// let parcels = client.query_features_batch("1=1", "*", Some(1000)).await?;
/// ```
#[derive(Clone)]
pub struct FeatureLayerClient {
    inner: Arc<FeatureLayerClientInner>,
}

struct FeatureLayerClientInner {
    layer_url: Url,
    token: Token,
    referer: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl FeatureLayerClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> FeatureLayerClientBuilder<Missing, Missing> {
        FeatureLayerClientBuilder::new()
    }

    /// Returns the layer URL.
    pub fn layer_url(&self) -> &Url {
        &self.inner.layer_url
    }

    /// Returns the token this client was bound to.
    pub fn token(&self) -> &Token {
        &self.inner.token
    }

    /// Returns the URL of an operation on this layer, e.g. `query`.
    pub(crate) fn operation_url(&self, operation: &str) -> Result<Url, Error> {
        let mut url = self.inner.layer_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConfigError::invalid_url(self.inner.layer_url.as_str(), "URL cannot be a base")
            })?
            .pop_if_empty()
            .push(operation);
        Ok(url)
    }

    /// Posts a form to a layer endpoint and returns the response body.
    ///
    /// Adds `f=json` and the token to `params`. Non-success statuses are
    /// mapped to errors here; the body still has to be decoded, since ArcGIS
    /// reports most errors with HTTP 200.
    pub(crate) async fn post_form(
        &self,
        url: Url,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<String, Error> {
        params.push(("f", "json".to_string()));
        params.push(("token", self.inner.token.as_str().to_string()));

        debug!(url = %url, "sending layer request");

        let mut request = self.inner.http_client.post(url).form(&params);

        if let Some(referer) = &self.inner.referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(TransportError::Network)?;
        read_layer_response(response).await
    }
}

impl std::fmt::Debug for FeatureLayerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureLayerClient")
            .field("layer_url", &self.inner.layer_url.as_str())
            .field("token", &self.inner.token)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`FeatureLayerClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The layer URL, e.g. `.../FeatureServer/0`
/// - `token` - A [`Token`] from [`Authenticator`](crate::auth::Authenticator)
///
/// # Example
///
/// ```ignore
/// let client = FeatureLayerClient::builder()
///     .url("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0")
///     .token(token)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct FeatureLayerClientBuilder<U, T> {
    url: U,
    token: T,
    certificate: Option<PathBuf>,
    referer: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl FeatureLayerClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token: Missing,
            certificate: None,
            referer: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for FeatureLayerClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FeatureLayerClientBuilder<Missing, T> {
    /// Sets the layer URL.
    pub fn url(self, url: impl Into<String>) -> FeatureLayerClientBuilder<Set<String>, T> {
        FeatureLayerClientBuilder {
            url: Set(url.into()),
            token: self.token,
            certificate: self.certificate,
            referer: self.referer,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> FeatureLayerClientBuilder<U, Missing> {
    /// Sets the token sent with every request.
    pub fn token(self, token: Token) -> FeatureLayerClientBuilder<U, Set<Token>> {
        FeatureLayerClientBuilder {
            url: self.url,
            token: Set(token),
            certificate: self.certificate,
            referer: self.referer,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, T> FeatureLayerClientBuilder<U, T> {
    /// Sets a PEM trust bundle used to verify the server certificate.
    ///
    /// Ignored when a custom HTTP client is supplied.
    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    /// Sends a `Referer` header with every request.
    ///
    /// Required when the token was issued with a referer binding.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl FeatureLayerClientBuilder<Set<String>, Set<Token>> {
    /// Builds the [`FeatureLayerClient`].
    ///
    /// This method is only available when both `url` and `token` have been set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid or the certificate
    /// cannot be loaded.
    pub fn build(self) -> Result<FeatureLayerClient, Error> {
        let layer_url = parse_endpoint(&self.url.0)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => build_http_client(self.certificate.as_deref(), self.connect_timeout)?,
        };

        Ok(FeatureLayerClient {
            inner: Arc::new(FeatureLayerClientInner {
                layer_url,
                token: self.token.0,
                referer: self.referer,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> FeatureLayerClient {
        FeatureLayerClient::builder()
            .url(url)
            .token(Token::new("abc"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_operation_url() {
        let layer = client("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0");
        assert_eq!(
            layer.operation_url("query").unwrap().as_str(),
            "https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0/query"
        );

        let trailing = client("https://gis.example.com/arcgis/rest/services/Parcels/MapServer/3/");
        assert_eq!(
            trailing.operation_url("deleteFeatures").unwrap().as_str(),
            "https://gis.example.com/arcgis/rest/services/Parcels/MapServer/3/deleteFeatures"
        );
    }

    #[test]
    fn test_build_rejects_invalid_url() {
        let err = FeatureLayerClient::builder()
            .url("FeatureServer/0")
            .token(Token::new("abc"))
            .build()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_build_rejects_missing_certificate() {
        let err = FeatureLayerClient::builder()
            .url("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0")
            .token(Token::new("abc"))
            .certificate("/nonexistent/agstools/ca.pem")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::CertificateRead { .. })
        ));
    }

    #[test]
    fn test_build_with_certificate() {
        let layer = FeatureLayerClient::builder()
            .url("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0")
            .token(Token::new("abc"))
            .certificate(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/gis-ca.pem"))
            .build()
            .unwrap();
        assert_eq!(layer.token().as_str(), "abc");
    }

    #[test]
    fn test_debug_redacts_token() {
        let layer = client("https://gis.example.com/arcgis/rest/services/Parcels/FeatureServer/0");
        assert!(!format!("{:?}", layer).contains("abc"));
    }
}
