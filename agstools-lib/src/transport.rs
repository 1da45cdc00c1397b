//! HTTP client construction shared by the authenticator and layer clients.

use std::path::Path;
use std::time::Duration;

use reqwest::Certificate;
use reqwest::Client;
use tracing::debug;

use crate::error::ConfigError;

/// Builds a `reqwest` client trusting the default roots plus, when given,
/// every certificate in the PEM bundle at `certificate`.
pub(crate) fn build_http_client(
    certificate: Option<&Path>,
    connect_timeout: Option<Duration>,
) -> Result<Client, ConfigError> {
    let mut builder = Client::builder();

    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    if let Some(path) = certificate {
        let certs = load_certificates(path)?;
        debug!(path = %path.display(), count = certs.len(), "loaded trust bundle");
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder.build().map_err(ConfigError::HttpClient)
}

/// Reads a PEM trust bundle from disk.
pub(crate) fn load_certificates(path: &Path) -> Result<Vec<Certificate>, ConfigError> {
    let pem = std::fs::read(path).map_err(|source| ConfigError::CertificateRead {
        path: path.to_path_buf(),
        source,
    })?;

    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| ConfigError::CertificateParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if certs.is_empty() {
        return Err(ConfigError::CertificateParse {
            path: path.to_path_buf(),
            message: "no PEM certificates found".to_string(),
        });
    }

    Ok(certs)
}

/// Parses and validates an http(s) endpoint URL.
pub(crate) fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_url(raw, "URL is empty"));
    }

    let url = url::Url::parse(trimmed).map_err(|e| ConfigError::invalid_url(raw, e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::invalid_url(
                raw,
                format!("unsupported scheme '{}'", other),
            ));
        }
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::invalid_url(raw, "URL has no host"));
    }

    Ok(url)
}
