//! In-place feature transformations

use crate::model::Feature;

use super::AttributeMapper;

/// Applies attribute transformations to a set of features.
#[derive(Debug, Clone, Default)]
pub struct FeatureProcessor {
    features: Vec<Feature>,
}

impl FeatureProcessor {
    /// Takes ownership of the features to process.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Renames every attribute that has a mapping; unmapped attributes keep
    /// their names.
    pub fn replace_attributes(&mut self, mapper: &AttributeMapper) -> &mut Self {
        for feature in &mut self.features {
            let attributes = std::mem::take(&mut feature.attributes);
            feature.attributes = attributes
                .into_iter()
                .map(|(name, value)| match mapper.get(&name) {
                    Some(target) => (target.to_string(), value),
                    None => (name, value),
                })
                .collect();
        }
        self
    }

    /// Drops the named attributes from every feature.
    pub fn remove_attributes<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        for feature in &mut self.features {
            for name in names {
                feature.remove(name.as_ref());
            }
        }
        self
    }

    /// Returns the features.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Consumes the processor and returns the features.
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_replace_and_remove() {
        let features = vec![
            Feature::new()
                .set("OBJECTID", 1)
                .set("PARCEL", "A-1")
                .set("NOTES", "keep")
                .with_geometry(json!({"x": 1.0, "y": 2.0})),
            Feature::new().set("OBJECTID", 2).set("PARCEL", "A-2"),
        ];
        let mapper = AttributeMapper::new().with_mapping("PARCEL", "PARCEL_ID");

        let mut processor = FeatureProcessor::new(features);
        processor
            .replace_attributes(&mapper)
            .remove_attributes(&["OBJECTID"]);
        let features = processor.into_features();

        assert_eq!(features[0].get_str("PARCEL_ID").unwrap(), Some("A-1"));
        assert_eq!(features[0].get_str("NOTES").unwrap(), Some("keep"));
        assert!(!features[0].contains("PARCEL"));
        assert!(!features[0].contains("OBJECTID"));
        assert_eq!(features[0].geometry, Some(json!({"x": 1.0, "y": 2.0})));
        assert_eq!(features[1].get_str("PARCEL_ID").unwrap(), Some("A-2"));
    }
}
