//! Natural-language insights over the preprocessed chart data.

use crate::chart::preprocess::{series_values, PreprocessedData};
use crate::types::{format_number, ChartIntent, ChartType, DataValue};

/// Insight cap applied after all candidates are collected.
pub const MAX_INSIGHTS: usize = 6;

/// Generate insights for a chart.
///
/// Always leads with min/max/average of the primary series, then adds
/// chart-type-specific observations, then a note when any values were
/// null-coerced during preprocessing.
pub fn generate_insights(
    intent: &ChartIntent,
    pre: &PreprocessedData,
    max_insights: usize,
) -> Vec<String> {
    let mut insights = Vec::new();

    let Some(primary) = intent.visual_mapping.y_axis.first() else {
        return insights;
    };
    let values = series_values(pre, primary);
    if values.is_empty() {
        return insights;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    insights.push(format!(
        "{primary} ranges from {} to {}",
        format_number(min),
        format_number(max)
    ));
    insights.push(format!("Average {primary} is {}", format_number(mean)));

    match intent.chart_type {
        ChartType::Line | ChartType::Area => {
            if let (Some(first), Some(last)) = (values.first(), values.last()) {
                let direction = if last > first {
                    "upward"
                } else if last < first {
                    "downward"
                } else {
                    "flat"
                };
                insights.push(format!(
                    "Overall {direction} trend ({} → {})",
                    format_number(*first),
                    format_number(*last)
                ));
            }
        }
        ChartType::Pie => {
            if let Some(leader) = leading_category(intent, pre, primary) {
                let total: f64 = values.iter().sum();
                if total > 0.0 {
                    insights.push(format!(
                        "\"{}\" leads with {:.1}% of the total",
                        leader.0,
                        leader.1 / total * 100.0
                    ));
                }
            }
        }
        ChartType::Bar => {
            let mut ranked = categorized_values(intent, pre, primary);
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            if ranked.len() >= 2 {
                insights.push(format!(
                    "\"{}\" ({}) ranks ahead of \"{}\" ({})",
                    ranked[0].0,
                    format_number(ranked[0].1),
                    ranked[1].0,
                    format_number(ranked[1].1)
                ));
            }
        }
    }

    if pre.coerced_nulls > 0 {
        insights.push(format!(
            "{} value(s) could not be read as numbers and were treated as missing",
            pre.coerced_nulls
        ));
    }

    insights.truncate(max_insights.min(MAX_INSIGHTS));
    insights
}

fn categorized_values(
    intent: &ChartIntent,
    pre: &PreprocessedData,
    series: &str,
) -> Vec<(String, f64)> {
    let x = &intent.visual_mapping.x_axis;
    pre.rows
        .iter()
        .filter_map(|row| {
            let label = match row.get(x) {
                Some(DataValue::Null) | None => return None,
                Some(value) => value.display(),
            };
            row.get(series).and_then(|v| v.as_f64()).map(|n| (label, n))
        })
        .collect()
}

fn leading_category(
    intent: &ChartIntent,
    pre: &PreprocessedData,
    series: &str,
) -> Option<(String, f64)> {
    categorized_values(intent, pre, series)
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
