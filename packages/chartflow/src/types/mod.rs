//! Shared vocabulary for the pipeline: values, rows, schemas, intents,
//! configurations.

pub mod chart;
pub mod intent;
pub mod schema;
pub mod unified;
pub mod value;

pub use chart::{
    AxisConfig, AxisType, ChartAxes, ChartConfig, Dimensions, LegendConfig, LegendPosition,
};
pub use intent::{ChartIntent, ChartType, IntentSuggestions, VisualMapping};
pub use schema::{DataSchema, FieldDescriptor, FieldType};
pub use unified::{
    DataSource, DatasetMetadata, DatasetStatistics, ExtractedData, ExtractionMethod,
    NumericSummary, UnifiedDataStructure,
};
pub use value::{format_number, parse_number, DataRow, DataValue};
