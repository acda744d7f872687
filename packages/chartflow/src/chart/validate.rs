//! Structural validation of an intent against the dataset.
//!
//! Every rejection here is fatal for the request, never retried; the
//! director surfaces it as a typed error on the result object.

use std::collections::HashSet;

use crate::error::{ChartError, Result, Stage};
use crate::types::{ChartIntent, ChartType, FieldType, UnifiedDataStructure};

/// Hard cap on distinct pie categories.
pub const PIE_MAX_CATEGORIES: usize = 12;

/// Minimum data points for a line chart.
pub const LINE_MIN_POINTS: usize = 2;

/// Check the intent against the chosen chart type's structural requirements.
pub fn validate_intent(intent: &ChartIntent, unified: &UnifiedDataStructure) -> Result<()> {
    if !unified.is_valid {
        return Err(ChartError::invalid_request(
            Stage::ChartGeneration,
            format!(
                "dataset failed validation: {}",
                unified.validation_errors.join("; ")
            ),
        ));
    }

    if unified.data.is_empty() {
        return Err(ChartError::insufficient_data(
            Stage::ChartGeneration,
            "dataset has no rows",
        ));
    }

    for field in &intent.required_fields {
        if !unified.schema.has_field(field) {
            return Err(ChartError::invalid_request(
                Stage::ChartGeneration,
                format!("required field '{field}' is missing from the dataset"),
            ));
        }
    }

    let numeric_series = intent
        .visual_mapping
        .y_axis
        .iter()
        .filter(|name| unified.schema.field_type(name) == Some(FieldType::Number))
        .count();
    if numeric_series == 0 {
        return Err(ChartError::data_incompatible(
            Stage::ChartGeneration,
            format!("a {} chart needs at least one numeric field", intent.chart_type),
        ));
    }

    match intent.chart_type {
        ChartType::Pie => {
            let categories = distinct_categories(intent, unified);
            if categories > PIE_MAX_CATEGORIES {
                return Err(ChartError::invalid_request(
                    Stage::ChartGeneration,
                    format!(
                        "pie chart has {categories} categories (max {PIE_MAX_CATEGORIES}); consider a bar chart instead"
                    ),
                ));
            }
        }
        ChartType::Line => {
            if unified.data.len() < LINE_MIN_POINTS {
                return Err(ChartError::invalid_request(
                    Stage::ChartGeneration,
                    format!("a line chart needs at least {LINE_MIN_POINTS} data points"),
                ));
            }
        }
        ChartType::Bar | ChartType::Area => {}
    }

    Ok(())
}

/// Number of distinct non-null x values.
pub fn distinct_categories(intent: &ChartIntent, unified: &UnifiedDataStructure) -> usize {
    let x = &intent.visual_mapping.x_axis;
    let mut seen: HashSet<String> = HashSet::new();
    for row in &unified.data {
        if let Some(value) = row.get(x) {
            if !value.is_null() {
                seen.insert(value.display());
            }
        }
    }
    seen.len()
}
