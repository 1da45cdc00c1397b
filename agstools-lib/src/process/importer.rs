//! Layer-to-layer feature import

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::api::DEFAULT_ADD_BATCH_SIZE;
use crate::error::Error;
use crate::error::FieldError;
use crate::error::ProtocolError;
use crate::model::EditResult;
use crate::model::Feature;
use crate::model::LayerDefinition;
use crate::FeatureLayerClient;

use super::AttributeMapper;
use super::FeatureProcessor;

/// Outcome of [`FeatureImporter::import_features`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Source features added to the target.
    pub added: usize,
    /// Source features in chunks the target rejected; they stay in the source.
    pub rejected: usize,
    /// Imported features deleted from the source.
    pub deleted: usize,
    /// Source features already present in the target and deleted from the source.
    pub stale_deleted: usize,
}

/// Moves features from a source layer into a target layer.
///
/// Features are matched on a unique-id field. For each run:
///
/// - in source, not in target: added to the target, then deleted from the source
/// - in source and target: deleted from the source
/// - in target, not in source: left alone
///
/// Attribute names are translated with an automatic mapper (every field name
/// the two layers share) overridden by an optional custom mapper.
#[derive(Debug, Clone)]
pub struct FeatureImporter {
    source: FeatureLayerClient,
    target: FeatureLayerClient,
    source_definition: LayerDefinition,
    target_definition: LayerDefinition,
    auto_mapper: AttributeMapper,
    custom_mapper: AttributeMapper,
    batch_size: Option<usize>,
}

impl FeatureImporter {
    /// Reads both layer definitions and builds the automatic mapper.
    pub async fn new(
        source: FeatureLayerClient,
        target: FeatureLayerClient,
        custom_mapper: Option<AttributeMapper>,
    ) -> Result<Self, Error> {
        let source_definition = source.definition().await?;
        let target_definition = target.definition().await?;
        let auto_mapper = shared_fields(&source_definition, &target_definition);

        debug!(shared = auto_mapper.len(), "built automatic attribute mapper");

        Ok(Self {
            source,
            target,
            source_definition,
            target_definition,
            auto_mapper,
            custom_mapper: custom_mapper.unwrap_or_default(),
            batch_size: None,
        })
    }

    /// Sets the number of features per `addFeatures` request.
    ///
    /// Each request is applied all-or-nothing, so one rejected feature keeps
    /// its whole chunk in the source.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Returns the effective mapper: automatic entries overridden by custom ones.
    pub fn attribute_map(&self) -> AttributeMapper {
        self.auto_mapper.merged_with(&self.custom_mapper)
    }

    /// Runs one import pass.
    ///
    /// `source_uid_field` and `target_uid_field` name the field that
    /// identifies the same real-world feature in each layer.
    pub async fn import_features(
        &self,
        source_uid_field: &str,
        target_uid_field: &str,
    ) -> Result<ImportSummary, Error> {
        let mapper = self.attribute_map();
        let source_oid = object_id_field(&self.source_definition)?;

        let (source_fields, target_fields) =
            self.query_fields(&mapper, source_uid_field, target_uid_field)?;

        let source_features = self
            .source
            .query_features_batch("1=1", source_fields, None)
            .await?
            .into_features();
        let target_features = self
            .target
            .query_features_batch("1=1", target_fields, None)
            .await?;

        let target_index = target_features
            .iter()
            .map(|f| uid_key(f, target_uid_field))
            .collect::<Result<HashSet<_>, _>>()?;

        let mut unmatched = Vec::new();
        let mut matched_oids = Vec::new();
        for feature in source_features {
            if target_index.contains(&uid_key(&feature, source_uid_field)?) {
                matched_oids.push(object_id(&feature, source_oid)?);
            } else {
                unmatched.push(feature);
            }
        }

        let mut summary = ImportSummary::default();

        debug!(count = unmatched.len(), "adding target features");
        if !unmatched.is_empty() {
            let source_oids = unmatched
                .iter()
                .map(|f| object_id(f, source_oid))
                .collect::<Result<Vec<_>, _>>()?;

            let mut processor = FeatureProcessor::new(unmatched);
            processor
                .replace_attributes(&mapper)
                .remove_attributes(&[source_oid]);

            let batch_size = self.batch_size.unwrap_or(DEFAULT_ADD_BATCH_SIZE).max(1);
            let mut added_oids = Vec::new();

            // Chunks are sent with rollbackOnFailure; a chunk with any failed
            // result was not applied, whatever the other results say.
            for (features, oids) in processor
                .features()
                .chunks(batch_size)
                .zip(source_oids.chunks(batch_size))
            {
                let results = self.target.add_features(features).await?;
                if chunk_applied(&results, features.len()) {
                    added_oids.extend_from_slice(oids);
                } else {
                    warn!(count = features.len(), "target rejected chunk, keeping source features");
                }
            }

            summary.added = added_oids.len();
            summary.rejected = source_oids.len() - added_oids.len();

            debug!(count = added_oids.len(), "deleting imported source features");
            summary.deleted = count_successes(&self.source.delete_features(&added_oids).await?);
        }

        debug!(count = matched_oids.len(), "deleting stale source features");
        if !matched_oids.is_empty() {
            summary.stale_deleted =
                count_successes(&self.source.delete_features(&matched_oids).await?);
        }

        info!(
            added = summary.added,
            rejected = summary.rejected,
            deleted = summary.deleted,
            stale_deleted = summary.stale_deleted,
            "import complete"
        );
        Ok(summary)
    }

    /// Fields queried from each layer: the mapped ones plus uid and object id.
    fn query_fields(
        &self,
        mapper: &AttributeMapper,
        source_uid_field: &str,
        target_uid_field: &str,
    ) -> Result<(Vec<String>, Vec<String>), Error> {
        let source_oid = object_id_field(&self.source_definition)?;
        let target_oid = object_id_field(&self.target_definition)?;

        Ok((
            field_list(mapper.source_fields(), &[source_uid_field, source_oid]),
            field_list(mapper.target_fields(), &[target_uid_field, target_oid]),
        ))
    }
}

/// Mapper pairing every field name present in both layers with itself.
fn shared_fields(source: &LayerDefinition, target: &LayerDefinition) -> AttributeMapper {
    let target_names: HashSet<&str> = target.field_names().collect();
    source
        .field_names()
        .filter(|name| target_names.contains(name))
        .map(|name| (name, name))
        .collect()
}

fn object_id_field(definition: &LayerDefinition) -> Result<&str, Error> {
    definition.object_id_field_name().ok_or_else(|| {
        ProtocolError::new(format!(
            "layer '{}' does not declare an object id field",
            definition.name
        ))
        .into()
    })
}

/// Mapped fields plus the ones the import needs, without duplicates.
fn field_list<'a>(mapped: impl Iterator<Item = &'a str>, required: &[&'a str]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for name in mapped.chain(required.iter().copied()) {
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

/// Comparable key for a uid attribute; numbers and strings compare by text.
fn uid_key(feature: &Feature, field: &str) -> Result<String, FieldError> {
    match feature.get(field) {
        None => Err(FieldError::missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

fn object_id(feature: &Feature, field: &str) -> Result<i64, FieldError> {
    feature
        .get_i64(field)?
        .ok_or_else(|| FieldError::type_mismatch(field, "integer", "null"))
}

fn chunk_applied(results: &[EditResult], sent: usize) -> bool {
    results.len() == sent && results.iter().all(|r| r.success)
}

fn count_successes(results: &[EditResult]) -> usize {
    results.iter().filter(|r| r.success).count()
}
