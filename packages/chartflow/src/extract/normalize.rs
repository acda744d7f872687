//! Unified normalizer: wraps extracted rows, their source, and the computed
//! schema/statistics into one [`UnifiedDataStructure`], then runs quality
//! validation.
//!
//! Order is infer-then-clean: the schema is inferred over raw rows, and only
//! then are cells coerced into the inferred types.

use chrono::Utc;
use indexmap::IndexMap;
use tracing::debug;

use crate::inference::{clean_data, infer_schema, InferenceConfig};
use crate::types::{
    DataRow, DataSchema, DataSource, DatasetMetadata, DatasetStatistics, ExtractedData,
    FieldType, NumericSummary, UnifiedDataStructure,
};

const PREVIEW_ROWS: usize = 5;

/// Wrap an extraction into the unified structure all downstream stages
/// consume. Never mutated afterwards; a disqualified structure is replaced
/// by a new extraction attempt, not patched.
pub fn normalize(
    extracted: &ExtractedData,
    source: DataSource,
    config: &InferenceConfig,
    min_quality_score: f32,
) -> UnifiedDataStructure {
    let schema = infer_schema(&extracted.data, config);
    let data = clean_data(&extracted.data, &schema);
    let statistics = compute_statistics(&data, &schema);

    let mut validation_errors = Vec::new();
    if data.is_empty() {
        validation_errors.push("dataset is empty".to_string());
    }
    if schema.fields.is_empty() && !data.is_empty() {
        validation_errors.push("no fields detected".to_string());
    }
    if !data.is_empty() && schema.quality_score < min_quality_score {
        validation_errors.push(format!(
            "data quality score {:.2} is below the minimum {:.2}",
            schema.quality_score, min_quality_score
        ));
    }

    debug!(
        source = ?source,
        rows = data.len(),
        quality = schema.quality_score,
        valid = validation_errors.is_empty(),
        "normalized dataset"
    );

    let metadata = DatasetMetadata {
        source,
        extracted_at: Utc::now(),
        preview: data.iter().take(PREVIEW_ROWS).cloned().collect(),
        statistics,
    };

    UnifiedDataStructure::new(data, schema, metadata, validation_errors)
}

/// Dataset-level statistics over the cleaned rows.
fn compute_statistics(data: &[DataRow], schema: &DataSchema) -> DatasetStatistics {
    let total_cells = data.len() * schema.fields.len();
    let empty_cells: usize = data
        .iter()
        .flat_map(|row| row.values())
        .filter(|v| v.is_null())
        .count();
    let completeness = if total_cells == 0 {
        0.0
    } else {
        1.0 - empty_cells as f32 / total_cells as f32
    };

    let mut numeric = IndexMap::new();
    for field in &schema.fields {
        if field.field_type != FieldType::Number {
            continue;
        }
        let values: Vec<f64> = data
            .iter()
            .filter_map(|row| row.get(&field.name).and_then(|v| v.as_f64()))
            .collect();
        if values.is_empty() {
            continue;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        numeric.insert(field.name.clone(), NumericSummary { min, max, mean });
    }

    DatasetStatistics {
        row_count: data.len(),
        column_count: schema.fields.len(),
        completeness,
        numeric,
    }
}
