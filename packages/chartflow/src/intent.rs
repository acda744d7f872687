//! Chart intent resolution: chart type and field-to-axis mapping.
//!
//! Keyword heuristics over the user's phrasing decide the chart type when
//! they are confident; otherwise the schema shape picks a sensible default.

use tracing::debug;

use crate::error::{ChartError, Result, Stage};
use crate::types::{
    ChartIntent, ChartType, FieldType, IntentSuggestions, UnifiedDataStructure, VisualMapping,
};

const KEYWORD_CONFIDENCE: f32 = 0.85;
const REQUESTED_CONFIDENCE: f32 = 0.9;
const DEFAULT_CONFIDENCE: f32 = 0.6;

/// Category count at or below which a single-series dataset defaults to pie.
const PIE_DEFAULT_MAX_CATEGORIES: usize = 8;

const PIE_KEYWORDS: &[&str] = &["pie", "share", "proportion", "percentage", "饼图", "占比", "比例", "构成"];
const LINE_KEYWORDS: &[&str] = &["trend", "over time", "line", "折线", "趋势", "变化", "走势"];
const AREA_KEYWORDS: &[&str] = &["area", "cumulative", "stacked", "面积", "累计", "堆叠"];
const BAR_KEYWORDS: &[&str] = &["bar", "compare", "comparison", "ranking", "柱状", "对比", "排名", "排行"];

/// Decide a chart type and visual mapping for the dataset and phrasing.
///
/// `requested` (an explicit chart type on the request) overrides the
/// heuristics but still goes through the generator's validation.
pub fn resolve_intent(
    unified: &UnifiedDataStructure,
    prompt: &str,
    requested: Option<ChartType>,
) -> Result<ChartIntent> {
    let mapping = resolve_mapping(unified)?;

    let (mut chart_type, mut confidence) = match classify_by_keywords(prompt) {
        Some(chart_type) => (chart_type, KEYWORD_CONFIDENCE),
        None => (default_for_schema(unified, &mapping), DEFAULT_CONFIDENCE),
    };
    if let Some(explicit) = requested {
        chart_type = explicit;
        confidence = REQUESTED_CONFIDENCE;
    }

    // Pie charts carry a single value series.
    let y_axis = if chart_type == ChartType::Pie {
        mapping.y_axis.iter().take(1).cloned().collect()
    } else {
        mapping.y_axis.clone()
    };
    let color_by = match chart_type {
        ChartType::Line | ChartType::Bar => mapping.color_by.clone(),
        _ => None,
    };

    let mut required_fields = vec![mapping.x_axis.clone()];
    required_fields.extend(y_axis.iter().cloned());

    let title = format!("{} by {}", y_axis.join(" / "), mapping.x_axis);
    let description = format!(
        "{chart_type} chart over {} rows, keyed on {}",
        unified.data.len(),
        mapping.x_axis
    );

    debug!(chart_type = %chart_type, confidence, x = %mapping.x_axis, "resolved chart intent");

    Ok(ChartIntent {
        chart_type,
        confidence,
        required_fields,
        visual_mapping: VisualMapping {
            x_axis: mapping.x_axis,
            y_axis,
            color_by,
        },
        suggestions: IntentSuggestions {
            title,
            description,
            insights: Vec::new(),
        },
    })
}

/// Score the prompt against per-type keyword families; a strictly dominant
/// score wins.
fn classify_by_keywords(prompt: &str) -> Option<ChartType> {
    let lower = prompt.to_lowercase();
    let score = |keywords: &[&str]| keywords.iter().filter(|k| lower.contains(*k)).count();

    let candidates = [
        (ChartType::Pie, score(PIE_KEYWORDS)),
        (ChartType::Line, score(LINE_KEYWORDS)),
        (ChartType::Area, score(AREA_KEYWORDS)),
        (ChartType::Bar, score(BAR_KEYWORDS)),
    ];

    let (best, best_score) = candidates
        .iter()
        .max_by_key(|(_, score)| *score)
        .copied()?;
    if best_score == 0 {
        return None;
    }
    let dominant = candidates
        .iter()
        .filter(|(t, _)| *t != best)
        .all(|(_, score)| *score < best_score);
    dominant.then_some(best)
}

/// Schema-shape default when the phrasing gives no hint.
fn default_for_schema(unified: &UnifiedDataStructure, mapping: &VisualMapping) -> ChartType {
    if unified.schema.field_type(&mapping.x_axis) == Some(FieldType::Date) {
        return ChartType::Line;
    }
    if mapping.y_axis.len() == 1 && unified.data.len() <= PIE_DEFAULT_MAX_CATEGORIES {
        return ChartType::Pie;
    }
    ChartType::Bar
}

/// Pick the field-to-axis mapping from the schema: x is the first date
/// field, else the first text field, else the first field; y is every
/// numeric field except x.
fn resolve_mapping(unified: &UnifiedDataStructure) -> Result<VisualMapping> {
    let schema = &unified.schema;
    if schema.fields.is_empty() {
        return Err(ChartError::insufficient_data(
            Stage::IntentResolution,
            "dataset has no fields to map",
        ));
    }

    let x_axis = schema
        .fields
        .iter()
        .find(|f| f.field_type == FieldType::Date)
        .or_else(|| {
            schema
                .fields
                .iter()
                .find(|f| f.field_type == FieldType::Text)
        })
        .map(|f| f.name.clone())
        .unwrap_or_else(|| schema.fields[0].name.clone());

    let y_axis: Vec<String> = schema
        .numeric_fields()
        .into_iter()
        .filter(|name| *name != x_axis)
        .map(String::from)
        .collect();

    if y_axis.is_empty() {
        return Err(ChartError::data_incompatible(
            Stage::IntentResolution,
            "no numeric fields available for charting",
        ));
    }

    let color_by = schema
        .fields
        .iter()
        .filter(|f| f.field_type == FieldType::Text && f.name != x_axis)
        .map(|f| f.name.clone())
        .next();

    Ok(VisualMapping {
        x_axis,
        y_axis,
        color_by,
    })
}
