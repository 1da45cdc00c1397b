//! ArcGIS-specific error types

use serde::Deserialize;

/// Error payload returned by ArcGIS Server.
///
/// ArcGIS reports most failures with HTTP 200 and a body of the form
/// `{"error": {"code": 400, "message": "...", "details": ["..."]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArcGisErrorDetail {
    /// The error code (usually mirrors an HTTP status, e.g. 400 or 498).
    #[serde(default)]
    pub code: i64,
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
    /// Additional messages, e.g. the offending parameter.
    #[serde(default, deserialize_with = "deserialize_details")]
    pub details: Vec<String>,
}

impl ArcGisErrorDetail {
    /// Creates a new error detail with the given code and message.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Adds a detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Checks whether the message or any detail contains `needle`, ignoring case.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        std::iter::once(&self.message)
            .chain(self.details.iter())
            .any(|text| text.to_lowercase().contains(&needle))
    }
}

impl std::fmt::Display for ArcGisErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.details.is_empty() {
            write!(f, " ({})", self.details.join("; "))?;
        }
        Ok(())
    }
}

/// `details` is sometimes `null` rather than an empty array.
fn deserialize_details<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
