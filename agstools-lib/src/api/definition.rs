//! Layer definition retrieval

use tracing::debug;

use crate::error::Error;
use crate::model::LayerDefinition;
use crate::response::decode_layer_body;
use crate::FeatureLayerClient;

impl FeatureLayerClient {
    /// Fetches the layer's JSON definition (fields, object-id field, limits).
    ///
    /// # Errors
    ///
    /// Same classification as [`query_features_batch`](Self::query_features_batch).
    pub async fn definition(&self) -> Result<LayerDefinition, Error> {
        let url = self.layer_url().clone();
        let body = self.post_form(url, Vec::new()).await?;
        let definition: LayerDefinition = decode_layer_body(&body)?;

        debug!(
            name = %definition.name,
            fields = definition.fields.len(),
            max_record_count = ?definition.max_record_count,
            "fetched layer definition"
        );
        Ok(definition)
    }
}
