//! Feature edits: addFeatures and deleteFeatures

use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::error::ProtocolError;
use crate::model::edit::AddFeaturesResponse;
use crate::model::edit::DeleteFeaturesResponse;
use crate::model::EditResult;
use crate::model::Feature;
use crate::response::decode_layer_body;
use crate::FeatureLayerClient;

/// Number of features sent per `addFeatures` request by
/// [`FeatureLayerClient::add_features_batch`] when no size is given.
pub const DEFAULT_ADD_BATCH_SIZE: usize = 500;

impl FeatureLayerClient {
    /// Adds features to the layer in a single request.
    ///
    /// Sent with `rollbackOnFailure=true`, so the server applies all features
    /// or none. Per-feature failures come back as [`EditResult`]s with
    /// `success: false`, not as errors.
    pub async fn add_features(&self, features: &[Feature]) -> Result<Vec<EditResult>, Error> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_string(features)
            .map_err(|e| ProtocolError::new(format!("failed to encode features: {}", e)))?;

        let url = self.operation_url("addFeatures")?;
        let params = vec![
            ("features", payload),
            ("rollbackOnFailure", "true".to_string()),
        ];

        debug!(count = features.len(), "adding features");
        let body = self.post_form(url, params).await?;
        let response: AddFeaturesResponse = decode_layer_body(&body)?;

        log_failures("add", &response.add_results);
        Ok(response.add_results)
    }

    /// Adds features in chunks of `batch_size` (default
    /// [`DEFAULT_ADD_BATCH_SIZE`]), one request after another.
    ///
    /// Results are concatenated in input order. Stops at the first chunk that
    /// fails; chunks already sent stay applied.
    pub async fn add_features_batch(
        &self,
        features: &[Feature],
        batch_size: Option<usize>,
    ) -> Result<Vec<EditResult>, Error> {
        let batch_size = batch_size.unwrap_or(DEFAULT_ADD_BATCH_SIZE).max(1);
        let mut results = Vec::with_capacity(features.len());

        for chunk in features.chunks(batch_size) {
            results.extend(self.add_features(chunk).await?);
        }

        Ok(results)
    }

    /// Deletes features by object id.
    ///
    /// An empty id list sends no request.
    pub async fn delete_features(&self, object_ids: &[i64]) -> Result<Vec<EditResult>, Error> {
        if object_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = object_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let url = self.operation_url("deleteFeatures")?;
        let params = vec![("objectIds", ids)];

        debug!(count = object_ids.len(), "deleting features");
        let body = self.post_form(url, params).await?;
        let response: DeleteFeaturesResponse = decode_layer_body(&body)?;

        log_failures("delete", &response.delete_results);
        Ok(response.delete_results)
    }
}

fn log_failures(operation: &str, results: &[EditResult]) {
    for result in results.iter().filter(|r| !r.success) {
        warn!(
            operation,
            object_id = ?result.object_id,
            error = ?result.error,
            "edit rejected by server"
        );
    }
}
