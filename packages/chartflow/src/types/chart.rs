//! Renderer-agnostic chart configuration types.
//!
//! Pure output: no back-reference to the input data. Downstream renderers
//! consume these shapes as-is.

use serde::{Deserialize, Serialize};

/// How an axis scales its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
    Time,
}

/// One axis of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub label: String,

    #[serde(rename = "type")]
    pub axis_type: AxisType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAxes {
    #[serde(rename = "xAxis")]
    pub x_axis: AxisConfig,

    #[serde(rename = "yAxis")]
    pub y_axis: AxisConfig,
}

/// Where the legend sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Right,
}

/// Legend visibility and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    pub show: bool,
    pub position: LegendPosition,
}

/// Pixel dimensions of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// The full renderer-agnostic styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// One color per series, cycling the palette when series outnumber it
    pub colors: Vec<String>,

    pub dimensions: Dimensions,

    pub axes: ChartAxes,

    pub legend: LegendConfig,

    pub responsive: bool,
}
