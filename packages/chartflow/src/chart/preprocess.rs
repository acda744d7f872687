//! Chart preprocessing: project each row down to the mapped fields and
//! coerce series values numerically.

use crate::types::{ChartIntent, DataRow, DataValue, UnifiedDataStructure};

/// The projected rows plus a count of values that had to be null-coerced.
#[derive(Debug, Clone)]
pub struct PreprocessedData {
    pub rows: Vec<DataRow>,

    /// Non-null values that failed the permissive numeric parse
    pub coerced_nulls: usize,
}

/// Project rows to the mapped x/y/color fields.
///
/// Series values go through the permissive numeric parse (currency and
/// percent symbols and thousands separators stripped); a non-null value that
/// still fails to parse becomes null and is counted. Rows without a non-null
/// x value and at least one valid series value are dropped.
pub fn preprocess(intent: &ChartIntent, unified: &UnifiedDataStructure) -> PreprocessedData {
    let mapping = &intent.visual_mapping;
    let mut coerced_nulls = 0;

    let rows = unified
        .data
        .iter()
        .filter_map(|row| {
            let x_value = row.get(&mapping.x_axis).cloned().unwrap_or(DataValue::Null);

            let mut projected = DataRow::new();
            projected.insert(mapping.x_axis.clone(), x_value.clone());

            let mut valid_series = 0;
            for field in &mapping.y_axis {
                let raw = row.get(field).cloned().unwrap_or(DataValue::Null);
                let value = match raw.as_f64() {
                    Some(n) => {
                        valid_series += 1;
                        DataValue::Number(n)
                    }
                    None => {
                        if !raw.is_null() {
                            coerced_nulls += 1;
                        }
                        DataValue::Null
                    }
                };
                projected.insert(field.clone(), value);
            }

            if let Some(color) = &mapping.color_by {
                projected.insert(
                    color.clone(),
                    row.get(color).cloned().unwrap_or(DataValue::Null),
                );
            }

            (!x_value.is_null() && valid_series > 0).then_some(projected)
        })
        .collect();

    PreprocessedData { rows, coerced_nulls }
}

/// All valid values of one series across the preprocessed rows.
pub fn series_values(pre: &PreprocessedData, field: &str) -> Vec<f64> {
    pre.rows
        .iter()
        .filter_map(|row| row.get(field).and_then(|v| v.as_f64()))
        .collect()
}
