//! Features and feature collections

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::FieldError;

/// A single geographic feature: attributes plus an optional geometry.
///
/// The geometry is passed through untouched; this crate never interprets it.
/// Attribute getters follow one rule: `Err` if the field is missing or has the
/// wrong type, `Ok(None)` only if the field exists and is `null`.
///
/// # Example
///
/// ```
/// use agstools_lib::model::Feature;
///
/// let feature = Feature::new()
///     .set("OBJECTID", 7)
///     .set("NAME", "Main St");
///
/// assert_eq!(feature.get_i64("OBJECTID").unwrap(), Some(7));
/// assert_eq!(feature.get_str("NAME").unwrap(), Some("Main St"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Field name to value.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Server-defined geometry, e.g. `{"x": .., "y": ..}` or `{"rings": ..}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,
}

impl Feature {
    /// Creates an empty feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the geometry (builder pattern).
    pub fn with_geometry(mut self, geometry: Value) -> Self {
        self.geometry = Some(geometry);
        self
    }

    // =========================================================================
    // Raw attribute access
    // =========================================================================

    /// Returns a reference to the attribute value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Returns `true` if the feature has the given attribute.
    pub fn contains(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    /// Sets an attribute value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// Inserts an attribute value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(field.into(), value.into());
    }

    /// Removes an attribute and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.attributes.remove(field)
    }

    /// Renames an attribute, replacing any existing attribute named `to`.
    ///
    /// Returns `false` if `from` does not exist.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.attributes.remove(from) {
            Some(value) => {
                self.attributes.insert(to.to_string(), value);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    /// Gets a string attribute.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.attributes.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "string", type_name(other))),
        }
    }

    /// Gets an integer attribute.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.attributes.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "integer", "float")),
            Some(other) => Err(FieldError::type_mismatch(field, "integer", type_name(other))),
        }
    }

    /// Gets a floating point attribute. Integers are widened.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.attributes.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(FieldError::type_mismatch(field, "number", type_name(other))),
        }
    }

    /// Gets a boolean attribute.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.attributes.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", type_name(other))),
        }
    }

    /// Gets an `esriFieldTypeDate` attribute (epoch milliseconds).
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.get_i64(field) {
            Ok(Some(ms)) => DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "datetime", "integer")),
            Ok(None) => Ok(None),
            Err(FieldError::TypeMismatch { actual, .. }) => {
                Err(FieldError::type_mismatch(field, "datetime", actual))
            }
            Err(e) => Err(e),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An ordered sequence of features, in server return order.
///
/// Produced by [`FeatureLayerClient::query_features_batch`], which concatenates
/// every page of a query.
///
/// [`FeatureLayerClient::query_features_batch`]: crate::FeatureLayerClient::query_features_batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the features.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Consumes the collection and returns the features.
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    /// Returns an iterator over the features.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Returns the number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Appends a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl Extend<Feature> for FeatureCollection {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        self.features.extend(iter);
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn parcel() -> Feature {
        serde_json::from_value(json!({
            "attributes": {
                "OBJECTID": 12,
                "PARCEL_ID": "A-100",
                "AREA": 1520.5,
                "VACANT": false,
                "OWNER": null,
                "SURVEYED": 1767225600000i64
            },
            "geometry": {"x": -122.4, "y": 37.8}
        }))
        .unwrap()
    }

    #[test]
    fn test_typed_getters() {
        let feature = parcel();
        assert_eq!(feature.get_i64("OBJECTID").unwrap(), Some(12));
        assert_eq!(feature.get_str("PARCEL_ID").unwrap(), Some("A-100"));
        assert_eq!(feature.get_f64("AREA").unwrap(), Some(1520.5));
        assert_eq!(feature.get_f64("OBJECTID").unwrap(), Some(12.0));
        assert_eq!(feature.get_bool("VACANT").unwrap(), Some(false));
        assert_eq!(feature.get_str("OWNER").unwrap(), None);
        assert_eq!(
            feature.get_datetime("SURVEYED").unwrap(),
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_getter_errors() {
        let feature = parcel();
        assert!(matches!(
            feature.get_str("MISSING"),
            Err(FieldError::Missing { .. })
        ));
        assert!(matches!(
            feature.get_i64("PARCEL_ID"),
            Err(FieldError::TypeMismatch { actual: "string", .. })
        ));
        assert!(matches!(
            feature.get_i64("AREA"),
            Err(FieldError::TypeMismatch { actual: "float", .. })
        ));
        assert!(matches!(
            feature.get_datetime("PARCEL_ID"),
            Err(FieldError::TypeMismatch { expected: "datetime", .. })
        ));
    }

    #[test]
    fn test_rename_and_remove() {
        let mut feature = parcel();
        assert!(feature.rename("PARCEL_ID", "ParcelId"));
        assert!(!feature.contains("PARCEL_ID"));
        assert_eq!(feature.get_str("ParcelId").unwrap(), Some("A-100"));
        assert!(!feature.rename("PARCEL_ID", "ParcelId"));

        assert_eq!(feature.remove("OBJECTID"), Some(json!(12)));
        assert!(feature.get("OBJECTID").is_none());
    }

    #[test]
    fn test_serialize_without_geometry() {
        let feature = Feature::new().set("NAME", "Depot");
        assert_eq!(
            serde_json::to_value(&feature).unwrap(),
            json!({"attributes": {"NAME": "Depot"}})
        );
    }

    #[test]
    fn test_collection_preserves_order() {
        let mut collection: FeatureCollection =
            (1..=3).map(|id| Feature::new().set("OBJECTID", id)).collect();
        collection.extend(vec![Feature::new().set("OBJECTID", 4)]);

        let ids: Vec<i64> = collection
            .iter()
            .map(|f| f.get_i64("OBJECTID").unwrap().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(collection.len(), 4);
    }
}
