//! Edit results

use serde::Deserialize;
use serde::Serialize;

/// Outcome of adding or deleting one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    /// Object id of the affected feature.
    #[serde(default)]
    pub object_id: Option<i64>,
    /// Global id of the affected feature, if the layer has one.
    #[serde(default)]
    pub global_id: Option<String>,
    /// Whether the edit was applied.
    pub success: bool,
    /// Failure reason when `success` is `false`.
    #[serde(default)]
    pub error: Option<EditError>,
}

/// Per-feature edit failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditError {
    /// ArcGIS error code.
    #[serde(default)]
    pub code: i64,
    /// Description of the failure.
    #[serde(default)]
    pub description: String,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddFeaturesResponse {
    pub add_results: Vec<EditResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteFeaturesResponse {
    pub delete_results: Vec<EditResult>,
}
