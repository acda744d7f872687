//! Schema inference and cleaning engine.
//!
//! Two separate passes over a row set, always in this order:
//!
//! 1. [`infer_schema`] reads *raw* values and derives per-field type,
//!    nullability, uniqueness, and an overall quality score.
//! 2. [`clean_data`] rewrites values into the inferred types.
//!
//! Running inference over already-cleaned data would report falsely perfect
//! consistency, so the order is never reversed.
//!
//! All per-field statistics are computed over a bounded sample of rows
//! (first `sample_size`), so one invocation's cost does not scale with
//! dataset size beyond a constant factor.

use chrono::NaiveDate;
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

use crate::types::{
    parse_number, DataRow, DataSchema, DataValue, FieldDescriptor, FieldType,
};

/// Fraction of sampled values that must parse as booleans for a Boolean field.
const BOOLEAN_THRESHOLD: f64 = 0.8;

/// Fraction of sampled values that must parse numerically for a Number field.
const NUMBER_THRESHOLD: f64 = 0.8;

/// Fraction of sampled values that must parse as dates for a Date field.
const DATE_THRESHOLD: f64 = 0.6;

/// Tokens accepted as boolean values, lowercased.
const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y", "1", "是"];
const FALSY_TOKENS: &[&str] = &["false", "no", "n", "0", "否"];

/// Sampling bounds for schema inference.
///
/// An explicit value rather than a hidden module constant, so callers and
/// tests can exercise boundary dataset sizes deterministically.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// How many rows to sample for type inference and quality scoring
    pub sample_size: usize,

    /// How many raw values to retain per field descriptor
    pub sample_values: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            sample_values: 5,
        }
    }
}

impl InferenceConfig {
    /// Override the row sample size.
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }
}

/// Infer a schema from a raw row set.
///
/// A pure function of its row sample: identical input yields an identical
/// schema.
pub fn infer_schema(rows: &[DataRow], config: &InferenceConfig) -> DataSchema {
    if rows.is_empty() {
        return DataSchema::empty();
    }

    let sample = &rows[..rows.len().min(config.sample_size)];
    let field_names = collect_field_names(sample);

    let mut fields = Vec::with_capacity(field_names.len());
    let mut consistency_sum = 0.0_f64;
    let mut empty_cells = 0_usize;

    for name in &field_names {
        let cells: Vec<Option<&DataValue>> = sample.iter().map(|row| row.get(name)).collect();

        let values: Vec<&DataValue> = cells
            .iter()
            .filter_map(|c| *c)
            .filter(|v| !v.is_null())
            .collect();

        empty_cells += cells.len() - values.len();

        let field_type = infer_field_type(&values);
        consistency_sum += type_consistency(&values, field_type);

        fields.push(FieldDescriptor {
            name: name.clone(),
            field_type,
            nullable: values.len() < cells.len(),
            unique: is_unique(&values),
            sample_values: values
                .iter()
                .take(config.sample_values)
                .map(|v| (*v).clone())
                .collect(),
        });
    }

    let total_cells = sample.len() * field_names.len();
    let completeness = if total_cells == 0 {
        0.0
    } else {
        1.0 - empty_cells as f64 / total_cells as f64
    };
    let mean_consistency = if fields.is_empty() {
        0.0
    } else {
        consistency_sum / fields.len() as f64
    };
    let quality_score = (completeness * mean_consistency).clamp(0.0, 1.0) as f32;

    debug!(
        fields = fields.len(),
        rows = rows.len(),
        sampled = sample.len(),
        quality = quality_score,
        "inferred schema"
    );

    DataSchema {
        fields,
        row_count: rows.len(),
        quality_score,
    }
}

/// Re-coerce every cell per its field's declared type.
///
/// Numbers get the permissive numeric parse (failed parse → null), dates are
/// parsed and re-serialized ISO-8601 (failed parse → null), booleans are
/// matched against the fixed token lists, text is trimmed. Returns new rows;
/// the input is untouched.
pub fn clean_data(rows: &[DataRow], schema: &DataSchema) -> Vec<DataRow> {
    rows.iter()
        .map(|row| {
            schema
                .fields
                .iter()
                .map(|field| {
                    let value = row.get(&field.name).unwrap_or(&DataValue::Null);
                    (field.name.clone(), coerce_value(value, field.field_type))
                })
                .collect()
        })
        .collect()
}

/// Classify a single value independently of any field context.
///
/// Returns `None` for nulls. Used by consistency scoring, which compares
/// each value's own classification against the field's declared type.
pub fn classify_value(value: &DataValue) -> Option<FieldType> {
    match value {
        DataValue::Null => None,
        DataValue::Bool(_) => Some(FieldType::Boolean),
        DataValue::Number(n) => {
            if *n == 0.0 || *n == 1.0 {
                // 0/1 counts as boolean-ish; see infer_field_type ordering
                Some(FieldType::Boolean)
            } else {
                Some(FieldType::Number)
            }
        }
        DataValue::Date(_) => Some(FieldType::Date),
        DataValue::Text(s) => {
            let trimmed = s.trim();
            if parse_bool_token(trimmed).is_some() {
                Some(FieldType::Boolean)
            } else if parse_number(trimmed).is_some() {
                Some(FieldType::Number)
            } else if parse_date(trimmed).is_some() {
                Some(FieldType::Date)
            } else {
                Some(FieldType::Text)
            }
        }
    }
}

/// Match a token against the fixed truthy/falsy lists.
pub fn parse_bool_token(raw: &str) -> Option<bool> {
    let token = raw.trim().to_lowercase();
    if TRUTHY_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSY_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Generic date parser: ISO and a handful of regional formats, plus RFC 3339
/// timestamps (truncated to their date).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日", "%d/%m/%Y", "%m-%d-%Y"];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Union of field names across sampled rows, in first-seen order.
fn collect_field_names(sample: &[DataRow]) -> Vec<String> {
    let mut names: IndexSet<String> = IndexSet::new();
    for row in sample {
        for key in row.keys() {
            names.insert(key.clone());
        }
    }
    names.into_iter().collect()
}

/// Classify a field from its sampled non-null values.
///
/// Boolean is deliberately checked before Number: a field of plain "0"/"1"
/// values lands as Boolean. Known bias, preserved for compatibility.
fn infer_field_type(values: &[&DataValue]) -> FieldType {
    if values.is_empty() {
        return FieldType::Text;
    }
    let total = values.len() as f64;

    let boolean_hits = values
        .iter()
        .filter(|v| matches!(classify_value(v), Some(FieldType::Boolean)))
        .count() as f64;
    if boolean_hits / total >= BOOLEAN_THRESHOLD {
        return FieldType::Boolean;
    }

    let number_hits = values
        .iter()
        .filter(|v| is_numeric_like(v))
        .count() as f64;
    if number_hits / total >= NUMBER_THRESHOLD {
        return FieldType::Number;
    }

    let date_hits = values
        .iter()
        .filter(|v| is_date_like(v))
        .count() as f64;
    if date_hits / total >= DATE_THRESHOLD {
        return FieldType::Date;
    }

    FieldType::Text
}

fn is_numeric_like(value: &DataValue) -> bool {
    match value {
        DataValue::Number(_) => true,
        DataValue::Text(s) => parse_number(s).is_some(),
        _ => false,
    }
}

fn is_date_like(value: &DataValue) -> bool {
    match value {
        DataValue::Date(_) => true,
        DataValue::Text(s) => parse_date(s).is_some(),
        _ => false,
    }
}

/// Fraction of sampled values whose own classification matches the declared
/// type. An empty sample is vacuously consistent.
fn type_consistency(values: &[&DataValue], declared: FieldType) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let matches = values
        .iter()
        .filter(|v| match declared {
            // A 0/1 value classifies Boolean but is a legitimate member of a
            // Number field too.
            FieldType::Number => is_numeric_like(v),
            FieldType::Date => is_date_like(v),
            other => classify_value(v) == Some(other),
        })
        .count();
    matches as f64 / values.len() as f64
}

/// Uniqueness can only be claimed from a sample with more than one value.
fn is_unique(values: &[&DataValue]) -> bool {
    if values.len() <= 1 {
        return false;
    }
    let mut seen: HashSet<String> = HashSet::with_capacity(values.len());
    values
        .iter()
        .all(|v| seen.insert(serde_json::to_string(v).unwrap_or_default()))
}

fn coerce_value(value: &DataValue, target: FieldType) -> DataValue {
    match target {
        FieldType::Number => match value {
            DataValue::Number(n) => DataValue::Number(*n),
            DataValue::Text(s) => parse_number(s).map_or(DataValue::Null, DataValue::Number),
            _ => DataValue::Null,
        },
        FieldType::Date => match value {
            DataValue::Date(d) => DataValue::Date(*d),
            DataValue::Text(s) => parse_date(s).map_or(DataValue::Null, DataValue::Date),
            _ => DataValue::Null,
        },
        FieldType::Boolean => match value {
            DataValue::Bool(b) => DataValue::Bool(*b),
            DataValue::Number(n) if *n == 1.0 => DataValue::Bool(true),
            DataValue::Number(n) if *n == 0.0 => DataValue::Bool(false),
            DataValue::Text(s) => parse_bool_token(s).map_or(DataValue::Null, DataValue::Bool),
            _ => DataValue::Null,
        },
        FieldType::Text => match value {
            DataValue::Null => DataValue::Null,
            DataValue::Text(s) => DataValue::Text(s.trim().to_string()),
            other => DataValue::Text(other.display()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(pairs: &[(&str, DataValue)]) -> DataRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> DataValue {
        DataValue::Text(s.to_string())
    }

    #[test]
    fn test_infer_schema_is_idempotent() {
        let rows = vec![
            row(&[("city", text("Beijing")), ("temp", DataValue::Number(22.0))]),
            row(&[("city", text("Shanghai")), ("temp", DataValue::Number(25.0))]),
        ];
        let config = InferenceConfig::default();
        let first = infer_schema(&rows, &config);
        let second = infer_schema(&rows, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_null_dataset_scores_zero() {
        let rows = vec![
            row(&[("a", DataValue::Null), ("b", DataValue::Null)]),
            row(&[("a", DataValue::Null), ("b", DataValue::Null)]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.quality_score, 0.0);
    }

    #[test]
    fn test_consistent_dataset_scores_one() {
        let rows = vec![
            row(&[("name", text("A")), ("value", DataValue::Number(60.0))]),
            row(&[("name", text("B")), ("value", DataValue::Number(40.0))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.quality_score, 1.0);
    }

    #[test]
    fn test_boolean_checked_before_number() {
        // Plain 0/1 fields land as Boolean; known bias, preserved.
        let rows = vec![
            row(&[("flag", text("0"))]),
            row(&[("flag", text("1"))]),
            row(&[("flag", text("1"))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.field_type("flag"), Some(FieldType::Boolean));
    }

    #[test]
    fn test_mixed_numbers_stay_numeric() {
        let rows = vec![
            row(&[("sales", text("1,200"))]),
            row(&[("sales", text("$50"))]),
            row(&[("sales", DataValue::Number(7.5))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.field_type("sales"), Some(FieldType::Number));
    }

    #[test]
    fn test_date_field_inferred() {
        let rows = vec![
            row(&[("day", text("2024-01-01"))]),
            row(&[("day", text("2024-01-02"))]),
            row(&[("day", text("not a date"))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.field_type("day"), Some(FieldType::Date));
    }

    #[test]
    fn test_unique_requires_multi_row_sample() {
        let single = vec![row(&[("id", text("x1"))])];
        let schema = infer_schema(&single, &InferenceConfig::default());
        assert!(!schema.field("id").unwrap().unique);

        let multi = vec![row(&[("id", text("x1"))]), row(&[("id", text("x2"))])];
        let schema = infer_schema(&multi, &InferenceConfig::default());
        assert!(schema.field("id").unwrap().unique);

        let dupes = vec![row(&[("id", text("x1"))]), row(&[("id", text("x1"))])];
        let schema = infer_schema(&dupes, &InferenceConfig::default());
        assert!(!schema.field("id").unwrap().unique);
    }

    #[test]
    fn test_sampling_bound_honored() {
        // Rows beyond the sample window must not influence the inferred type.
        let mut rows: Vec<DataRow> = (0..10)
            .map(|i| row(&[("v", DataValue::Number(i as f64 + 2.0))]))
            .collect();
        rows.extend((0..50).map(|_| row(&[("v", text("junk"))])));

        let config = InferenceConfig::default().with_sample_size(10);
        let schema = infer_schema(&rows, &config);
        assert_eq!(schema.field_type("v"), Some(FieldType::Number));
        assert_eq!(schema.row_count, 60);
    }

    #[test]
    fn test_clean_data_numeric_round_trip() {
        let rows = vec![
            row(&[("n", text("1,200"))]),
            row(&[("n", text("$50"))]),
            row(&[("n", text("  7 "))]),
            row(&[("n", DataValue::Null)]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.field_type("n"), Some(FieldType::Number));

        let cleaned = clean_data(&rows, &schema);
        let values: Vec<&DataValue> = cleaned.iter().map(|r| &r["n"]).collect();
        assert_eq!(
            values,
            vec![
                &DataValue::Number(1200.0),
                &DataValue::Number(50.0),
                &DataValue::Number(7.0),
                &DataValue::Null,
            ]
        );
    }

    #[test]
    fn test_clean_data_dates_reserialize_iso() {
        let rows = vec![
            row(&[("d", text("2024/03/05"))]),
            row(&[("d", text("2024年03月06日"))]),
            row(&[("d", text("garbage"))]),
        ];
        // Only 2 of 3 parse; 66% clears the 60% date threshold.
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert_eq!(schema.field_type("d"), Some(FieldType::Date));

        let cleaned = clean_data(&rows, &schema);
        assert_eq!(
            cleaned[0]["d"],
            DataValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert_eq!(cleaned[2]["d"], DataValue::Null);
    }

    #[test]
    fn test_clean_data_booleans_and_text() {
        let rows = vec![
            row(&[("ok", text("yes")), ("note", text("  hi  "))]),
            row(&[("ok", text("否")), ("note", text("there"))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        let cleaned = clean_data(&rows, &schema);
        assert_eq!(cleaned[0]["ok"], DataValue::Bool(true));
        assert_eq!(cleaned[1]["ok"], DataValue::Bool(false));
        assert_eq!(cleaned[0]["note"], text("hi"));
    }

    #[test]
    fn test_inference_reads_raw_values() {
        // A half-empty, inconsistent column must drag the score below 1.
        let rows = vec![
            row(&[("v", text("10"))]),
            row(&[("v", text("oops"))]),
            row(&[("v", DataValue::Null)]),
            row(&[("v", text("30"))]),
        ];
        let schema = infer_schema(&rows, &InferenceConfig::default());
        assert!(schema.quality_score < 1.0);
        assert!(schema.quality_score > 0.0);
    }

    proptest! {
        #[test]
        fn prop_quality_score_bounded(cells in proptest::collection::vec(
            proptest::option::of(-1000.0..1000.0f64),
            1..200,
        )) {
            let rows: Vec<DataRow> = cells
                .iter()
                .map(|c| {
                    let value = c.map_or(DataValue::Null, DataValue::Number);
                    row(&[("v", value)])
                })
                .collect();
            let schema = infer_schema(&rows, &InferenceConfig::default());
            prop_assert!((0.0..=1.0).contains(&schema.quality_score));
        }
    }
}
