//! Extraction output and the unified structure all downstream stages consume.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::schema::DataSchema;
use crate::types::value::DataRow;

/// How a row set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    AiParsing,
    RegexPattern,
    FileParsing,
}

/// Where a row set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Prompt,
    File,
}

/// Raw extractor output, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedData {
    pub data: Vec<DataRow>,

    /// Extractor trust in the rows, ∈ [0, 1]. The relative ordering across
    /// extraction methods is load-bearing for downstream validity gating.
    pub confidence: f32,

    #[serde(rename = "extractionMethod")]
    pub extraction_method: ExtractionMethod,

    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Min/max/mean summary for one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Dataset-level statistics computed during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    #[serde(rename = "rowCount")]
    pub row_count: usize,

    #[serde(rename = "columnCount")]
    pub column_count: usize,

    /// Fraction of non-empty cells across the whole (cleaned) dataset
    pub completeness: f32,

    /// Per-numeric-field summaries, in field order
    #[serde(default)]
    pub numeric: IndexMap<String, NumericSummary>,
}

/// Provenance and derived facts attached to a unified structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: DataSource,

    #[serde(rename = "extractedAt")]
    pub extracted_at: DateTime<Utc>,

    /// First ≤5 cleaned rows, for display
    pub preview: Vec<DataRow>,

    pub statistics: DatasetStatistics,
}

/// The single normalized bundle every downstream stage consumes.
///
/// Constructed once per extraction request and never mutated afterwards; a
/// disqualified structure is replaced by a new extraction attempt, not
/// patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedDataStructure {
    pub data: Vec<DataRow>,
    pub schema: DataSchema,
    pub metadata: DatasetMetadata,

    #[serde(rename = "isValid")]
    pub is_valid: bool,

    #[serde(rename = "validationErrors")]
    pub validation_errors: Vec<String>,
}

impl UnifiedDataStructure {
    /// Build a unified structure, deriving `is_valid` from the error list.
    pub fn new(
        data: Vec<DataRow>,
        schema: DataSchema,
        metadata: DatasetMetadata,
        validation_errors: Vec<String>,
    ) -> Self {
        Self {
            is_valid: validation_errors.is_empty(),
            data,
            schema,
            metadata,
            validation_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_tracks_errors() {
        let metadata = DatasetMetadata {
            source: DataSource::Prompt,
            extracted_at: Utc::now(),
            preview: vec![],
            statistics: DatasetStatistics {
                row_count: 0,
                column_count: 0,
                completeness: 0.0,
                numeric: IndexMap::new(),
            },
        };

        let ok = UnifiedDataStructure::new(vec![], DataSchema::empty(), metadata.clone(), vec![]);
        assert!(ok.is_valid);

        let bad = UnifiedDataStructure::new(
            vec![],
            DataSchema::empty(),
            metadata,
            vec!["dataset is empty".to_string()],
        );
        assert!(!bad.is_valid);
    }

    #[test]
    fn test_extraction_method_wire_names() {
        let json = serde_json::to_string(&ExtractionMethod::AiParsing).unwrap();
        assert_eq!(json, "\"ai_parsing\"");
        let json = serde_json::to_string(&ExtractionMethod::RegexPattern).unwrap();
        assert_eq!(json, "\"regex_pattern\"");
        let json = serde_json::to_string(&ExtractionMethod::FileParsing).unwrap();
        assert_eq!(json, "\"file_parsing\"");
    }
}
