//! Source-to-target attribute name mapping

use std::collections::BTreeMap;

/// Maps source field names to target field names.
///
/// Entries are kept sorted by source field so derived field lists are stable.
///
/// # Example
///
/// ```
/// use agstools_lib::process::AttributeMapper;
///
/// let auto = AttributeMapper::new()
///     .with_mapping("NAME", "NAME")
///     .with_mapping("STATUS", "STATUS");
/// let custom = AttributeMapper::new().with_mapping("STATUS", "STATE");
///
/// let merged = auto.merged_with(&custom);
/// assert_eq!(merged.get("STATUS"), Some("STATE"));
/// assert_eq!(merged.get("NAME"), Some("NAME"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMapper {
    map: BTreeMap<String, String>,
}

impl AttributeMapper {
    /// Creates an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping (builder pattern).
    pub fn with_mapping(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.add_mapping(source, target);
        self
    }

    /// Adds or replaces the mapping for `source`.
    pub fn add_mapping(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.map.insert(source.into(), target.into());
    }

    /// Removes the mapping for `source`, returning its target.
    pub fn remove_mapping(&mut self, source: &str) -> Option<String> {
        self.map.remove(source)
    }

    /// Returns the target field for `source`.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.map.get(source).map(String::as_str)
    }

    /// Returns the full source-to-target map.
    pub fn attribute_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }

    /// Source field names, sorted.
    pub fn source_fields(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Target field names, in source field order.
    pub fn target_fields(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(String::as_str)
    }

    /// Returns `true` if there are no mappings.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Combines two mappers; entries from `overrides` win.
    pub fn merged_with(&self, overrides: &AttributeMapper) -> AttributeMapper {
        let mut map = self.map.clone();
        map.extend(
            overrides
                .map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        AttributeMapper { map }
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for AttributeMapper {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(s, t)| (s.into(), t.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut mapper = AttributeMapper::new();
        mapper.add_mapping("OWNER", "OWNER_NAME");
        mapper.add_mapping("OWNER", "PROPERTY_OWNER");
        assert_eq!(mapper.get("OWNER"), Some("PROPERTY_OWNER"));
        assert_eq!(mapper.len(), 1);

        assert_eq!(mapper.remove_mapping("OWNER").as_deref(), Some("PROPERTY_OWNER"));
        assert!(mapper.is_empty());
    }

    #[test]
    fn test_field_lists_follow_source_order() {
        let mapper: AttributeMapper = [("ZONE", "Z"), ("AREA", "A"), ("NAME", "N")]
            .into_iter()
            .collect();
        assert_eq!(mapper.source_fields().collect::<Vec<_>>(), vec!["AREA", "NAME", "ZONE"]);
        assert_eq!(mapper.target_fields().collect::<Vec<_>>(), vec!["A", "N", "Z"]);
    }

    #[test]
    fn test_merge_keeps_base_entries() {
        let base = AttributeMapper::new().with_mapping("A", "A").with_mapping("B", "B");
        let custom = AttributeMapper::new().with_mapping("B", "B2").with_mapping("C", "C3");
        let merged = base.merged_with(&custom);

        assert_eq!(merged.get("A"), Some("A"));
        assert_eq!(merged.get("B"), Some("B2"));
        assert_eq!(merged.get("C"), Some("C3"));
        // Inputs untouched.
        assert_eq!(base.get("B"), Some("B"));
    }
}
