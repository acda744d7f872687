//! Chart intent: the decided chart type plus the field-to-axis mapping.

use serde::{Deserialize, Serialize};

/// Supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Area,
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
        };
        f.write_str(name)
    }
}

/// Which fields feed which visual channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMapping {
    #[serde(rename = "xAxis")]
    pub x_axis: String,

    #[serde(rename = "yAxis")]
    pub y_axis: Vec<String>,

    #[serde(rename = "colorBy", skip_serializing_if = "Option::is_none")]
    pub color_by: Option<String>,
}

/// Human-facing suggestions attached to an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSuggestions {
    pub title: String,
    pub description: String,

    #[serde(default)]
    pub insights: Vec<String>,
}

/// The decided chart type and mapping for a dataset and a user's phrasing.
///
/// Owned by the intent stage; consumed read-only by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartIntent {
    #[serde(rename = "chartType")]
    pub chart_type: ChartType,

    pub confidence: f32,

    #[serde(rename = "requiredFields")]
    pub required_fields: Vec<String>,

    #[serde(rename = "visualMapping")]
    pub visual_mapping: VisualMapping,

    pub suggestions: IntentSuggestions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_wire_names() {
        assert_eq!(serde_json::to_string(&ChartType::Pie).unwrap(), "\"pie\"");
        assert_eq!(ChartType::Line.to_string(), "line");
    }

    #[test]
    fn test_color_by_omitted_when_none() {
        let mapping = VisualMapping {
            x_axis: "month".into(),
            y_axis: vec!["sales".into()],
            color_by: None,
        };
        let json = serde_json::to_value(&mapping).unwrap();
        assert!(json.get("colorBy").is_none());
    }
}
