//! Chart configuration building: colors, dimensions, axes, legend.

use crate::chart::preprocess::PreprocessedData;
use crate::chart::validate::distinct_categories;
use crate::types::{
    AxisConfig, AxisType, ChartAxes, ChartConfig, ChartIntent, ChartType, Dimensions, FieldType,
    LegendConfig, LegendPosition, UnifiedDataStructure,
};

/// Fixed series palette, cycled when series outnumber it.
pub const DEFAULT_PALETTE: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 400;

/// Category count beyond which bar charts widen per category.
const BAR_WIDTH_THRESHOLD: usize = 12;
const BAR_WIDTH_PER_CATEGORY: u32 = 60;

/// Category count beyond which the legend moves to the top.
const LEGEND_TOP_THRESHOLD: usize = 8;

/// Fractional padding applied to each end of the y-axis range.
const AXIS_PADDING: f64 = 0.1;

/// Build the renderer-agnostic configuration for a validated intent.
pub fn build_config(
    intent: &ChartIntent,
    unified: &UnifiedDataStructure,
    pre: &PreprocessedData,
) -> ChartConfig {
    let mapping = &intent.visual_mapping;
    let categories = distinct_categories(intent, unified);

    let series_count = if intent.chart_type == ChartType::Pie {
        categories.max(1)
    } else {
        mapping.y_axis.len().max(1)
    };
    let colors = (0..series_count)
        .map(|i| DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()].to_string())
        .collect();

    let width = if intent.chart_type == ChartType::Bar && categories > BAR_WIDTH_THRESHOLD {
        DEFAULT_WIDTH.max(categories as u32 * BAR_WIDTH_PER_CATEGORY)
    } else {
        DEFAULT_WIDTH
    };

    let legend = LegendConfig {
        show: mapping.y_axis.len() > 1 || intent.chart_type == ChartType::Pie,
        position: if intent.chart_type == ChartType::Pie {
            LegendPosition::Right
        } else if categories > LEGEND_TOP_THRESHOLD {
            LegendPosition::Top
        } else {
            LegendPosition::Bottom
        },
    };

    let x_axis_type = match unified.schema.field_type(&mapping.x_axis) {
        Some(FieldType::Date) => AxisType::Time,
        Some(FieldType::Number) => AxisType::Value,
        _ => AxisType::Category,
    };

    let (y_min, y_max) = padded_range(pre, &mapping.y_axis);

    ChartConfig {
        colors,
        dimensions: Dimensions {
            width,
            height: DEFAULT_HEIGHT,
        },
        axes: ChartAxes {
            x_axis: AxisConfig {
                label: mapping.x_axis.clone(),
                axis_type: x_axis_type,
                min: None,
                max: None,
            },
            y_axis: AxisConfig {
                label: mapping.y_axis.join(" / "),
                axis_type: AxisType::Value,
                min: y_min,
                max: y_max,
            },
        },
        legend,
        responsive: true,
    }
}

/// Y-axis range over the actual values, padded 10% each side, min floored at
/// zero (negative values are not expected in this domain).
fn padded_range(pre: &PreprocessedData, y_fields: &[String]) -> (Option<f64>, Option<f64>) {
    let values: Vec<f64> = pre
        .rows
        .iter()
        .flat_map(|row| {
            y_fields
                .iter()
                .filter_map(|field| row.get(field).and_then(|v| v.as_f64()))
        })
        .collect();

    if values.is_empty() {
        return (None, None);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    (
        Some((min - span * AXIS_PADDING).max(0.0)),
        Some(max + span * AXIS_PADDING),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::preprocess::preprocess;
    use crate::extract::normalize;
    use crate::inference::InferenceConfig;
    use crate::intent::resolve_intent;
    use crate::types::{DataRow, DataSource, DataValue, ExtractedData, ExtractionMethod};

    fn unified(rows: Vec<DataRow>) -> UnifiedDataStructure {
        let extracted = ExtractedData {
            data: rows,
            confidence: 0.9,
            extraction_method: ExtractionMethod::FileParsing,
            warnings: Vec::new(),
        };
        normalize(&extracted, DataSource::File, &InferenceConfig::default(), 0.0)
    }

    fn category_rows(n: usize) -> Vec<DataRow> {
        (0..n)
            .map(|i| {
                let mut row = DataRow::new();
                row.insert("name".to_string(), DataValue::Text(format!("cat-{i}")));
                row.insert("value".to_string(), DataValue::Number(10.0 + i as f64));
                row
            })
            .collect()
    }

    #[test]
    fn test_pie_legend_on_the_right() {
        let unified = unified(category_rows(4));
        let intent = resolve_intent(&unified, "", Some(ChartType::Pie)).unwrap();
        let pre = preprocess(&intent, &unified);
        let config = build_config(&intent, &unified, &pre);

        assert!(config.legend.show);
        assert_eq!(config.legend.position, LegendPosition::Right);
        // One color per pie slice.
        assert_eq!(config.colors.len(), 4);
    }

    #[test]
    fn test_many_categories_move_legend_to_top() {
        let unified = unified(category_rows(10));
        let intent = resolve_intent(&unified, "", Some(ChartType::Bar)).unwrap();
        let pre = preprocess(&intent, &unified);
        let config = build_config(&intent, &unified, &pre);
        assert_eq!(config.legend.position, LegendPosition::Top);
    }

    #[test]
    fn test_bar_width_scales_with_categories() {
        let unified = unified(category_rows(20));
        let intent = resolve_intent(&unified, "", Some(ChartType::Bar)).unwrap();
        let pre = preprocess(&intent, &unified);
        let config = build_config(&intent, &unified, &pre);
        assert_eq!(config.dimensions.width, 1200);

        let small = self::unified(category_rows(5));
        let intent = resolve_intent(&small, "", Some(ChartType::Bar)).unwrap();
        let pre = preprocess(&intent, &small);
        let config = build_config(&intent, &small, &pre);
        assert_eq!(config.dimensions.width, 800);
    }

    #[test]
    fn test_y_range_padded_and_floored() {
        let unified = unified(category_rows(3)); // values 10, 11, 12
        let intent = resolve_intent(&unified, "", Some(ChartType::Bar)).unwrap();
        let pre = preprocess(&intent, &unified);
        let config = build_config(&intent, &unified, &pre);

        let min = config.axes.y_axis.min.unwrap();
        let max = config.axes.y_axis.max.unwrap();
        assert!((min - 9.8).abs() < 1e-9);
        assert!((max - 12.2).abs() < 1e-9);

        // Small values near zero: padding cannot push the floor negative.
        let tiny = self::unified(vec![
            category_rows(1).pop().unwrap(),
            {
                let mut row = DataRow::new();
                row.insert("name".to_string(), DataValue::Text("z".into()));
                row.insert("value".to_string(), DataValue::Number(0.5));
                row
            },
        ]);
        let intent = resolve_intent(&tiny, "", Some(ChartType::Bar)).unwrap();
        let pre = preprocess(&intent, &tiny);
        let config = build_config(&intent, &tiny, &pre);
        assert!(config.axes.y_axis.min.unwrap() >= 0.0);
    }

    #[test]
    fn test_time_axis_for_date_fields() {
        let rows = vec![
            ("2024-01-01", 3.0),
            ("2024-01-02", 4.0),
        ]
        .into_iter()
        .map(|(d, v)| {
            let mut row = DataRow::new();
            row.insert("day".to_string(), DataValue::Text(d.into()));
            row.insert("v".to_string(), DataValue::Number(v));
            row
        })
        .collect();
        let unified = unified(rows);
        let intent = resolve_intent(&unified, "", Some(ChartType::Line)).unwrap();
        let pre = preprocess(&intent, &unified);
        let config = build_config(&intent, &unified, &pre);
        assert_eq!(config.axes.x_axis.axis_type, AxisType::Time);
    }
}
