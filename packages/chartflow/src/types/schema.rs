//! Schema types: the inferred structural description of a row set.

use serde::{Deserialize, Serialize};

use crate::types::value::DataValue;

/// The inferred type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        };
        f.write_str(name)
    }
}

/// Per-field description derived from a bounded sample of rows.
///
/// `sample_values` holds up to 5 raw (pre-cleaning) non-null values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether any sampled cell was null or missing
    pub nullable: bool,

    /// True only when the sampled values are all distinct and the sample
    /// has more than one row
    pub unique: bool,

    #[serde(rename = "sampleValues")]
    pub sample_values: Vec<DataValue>,
}

/// The inferred structural description of a row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    pub fields: Vec<FieldDescriptor>,

    #[serde(rename = "rowCount")]
    pub row_count: usize,

    /// Completeness × mean type-consistency, both over the sample; ∈ [0, 1]
    #[serde(rename = "qualityScore")]
    pub quality_score: f32,
}

impl DataSchema {
    /// An empty schema for a row set with no rows.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            row_count: 0,
            quality_score: 0.0,
        }
    }

    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the schema contains a field with this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of all fields inferred as numeric.
    pub fn numeric_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.field_type == FieldType::Number)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// The declared type of a field, if present.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field(name).map(|f| f.field_type)
    }
}
