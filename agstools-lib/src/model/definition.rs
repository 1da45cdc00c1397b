//! Layer definition

use serde::Deserialize;
use serde::Serialize;

/// Field type ArcGIS uses for the object-id column.
pub const OID_FIELD_TYPE: &str = "esriFieldTypeOID";

/// The JSON description of a feature/map layer (`<layer>?f=json`).
///
/// Only the parts this crate relies on are modelled; the rest of the payload
/// is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    /// Layer id within its service.
    #[serde(default)]
    pub id: Option<i64>,
    /// Layer name.
    #[serde(default)]
    pub name: String,
    /// Name of the object-id field.
    #[serde(default)]
    pub object_id_field: Option<String>,
    /// Name of the global-id field, if the layer has one.
    #[serde(default)]
    pub global_id_field: Option<String>,
    /// Geometry type, e.g. `esriGeometryPoint`.
    #[serde(default)]
    pub geometry_type: Option<String>,
    /// Server-side maximum number of records per query page.
    #[serde(default)]
    pub max_record_count: Option<u32>,
    /// Attribute fields.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl LayerDefinition {
    /// Returns the object-id field name.
    ///
    /// Uses `objectIdField` when present, otherwise the first field typed
    /// `esriFieldTypeOID`. Map service layers often only provide the latter.
    pub fn object_id_field_name(&self) -> Option<&str> {
        self.object_id_field.as_deref().or_else(|| {
            self.fields
                .iter()
                .find(|f| f.field_type == OID_FIELD_TYPE)
                .map(|f| f.name.as_str())
        })
    }

    /// Returns the names of all fields, in definition order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single attribute field of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name.
    pub name: String,
    /// ArcGIS field type, e.g. `esriFieldTypeString`.
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Display alias.
    #[serde(default)]
    pub alias: Option<String>,
    /// Whether the field accepts nulls.
    #[serde(default)]
    pub nullable: Option<bool>,
    /// Whether the field can be edited.
    #[serde(default)]
    pub editable: Option<bool>,
}
