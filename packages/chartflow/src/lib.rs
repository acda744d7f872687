//! Prompt/File → Chart Pipeline
//!
//! Turns unstructured user input (free-text prompts, optionally accompanied
//! by spreadsheet/CSV files) into a validated, chart-ready dataset plus a
//! chosen visualization type and styling configuration.
//!
//! # Design Philosophy
//!
//! The hard problem is the extraction/inference pipeline, not rendering:
//!
//! - Decide whether data is inline in text, in a file, or absent
//! - Pull a best-effort table out of whichever source is present, AI-first
//!   with a deterministic regex fallback chain
//! - Infer a schema (types, nullability, uniqueness) and a quality score
//! - Choose a chart type and field-to-axis mapping consistent with it
//! - Validate against type-specific constraints and fail predictably
//!
//! Data flows strictly downstream; each stage returns a new value, and no
//! stage mutates another's output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chartflow::{ChartPipeline, ChartRequest};
//! use chartflow::testing::MockChat;
//!
//! let pipeline = ChartPipeline::new(MockChat::always_miss());
//! let request = ChartRequest::from_prompt("Beijing[22,23,24], Shanghai[25,26,27]");
//! let result = pipeline.generate_chart(&request).await;
//! assert!(result.success);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The ChatModel seam for LLM providers
//! - [`types`] - Values, rows, schemas, intents, chart configurations
//! - [`inference`] - Schema inference and cleaning engine
//! - [`extract`] - Prompt and file extractors plus normalization
//! - [`intent`] - Chart-type and axis-mapping heuristics
//! - [`chart`] - Validation, preprocessing, configuration, insights
//! - [`director`] - Pipeline orchestration and the result type
//! - [`testing`] - Mock chat model for tests

pub mod chart;
pub mod director;
pub mod error;
pub mod extract;
pub mod inference;
pub mod intent;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{ChartError, ChatError, ErrorKind, Result, Stage};
pub use traits::{ChatMessage, ChatModel, ChatRequest, ChatResponse};
pub use types::{
    AxisConfig, AxisType, ChartAxes, ChartConfig, ChartIntent, ChartType, DataRow, DataSchema,
    DataSource, DataValue, DatasetMetadata, DatasetStatistics, Dimensions, ExtractedData,
    ExtractionMethod, FieldDescriptor, FieldType, IntentSuggestions, LegendConfig, LegendPosition,
    NumericSummary, UnifiedDataStructure, VisualMapping,
};

// Re-export the engine surface
pub use chart::{ChartGenerator, GeneratedChart, DEFAULT_PALETTE, PIE_MAX_CATEGORIES};
pub use director::{
    ChartGenerationResult, ChartPipeline, ChartRequest, FileInput, PipelineConfig, ResultMetadata,
};
pub use extract::{
    extract_from_file, extract_with_patterns, normalize, AiParseResponse, PromptExtractor,
    DATA_PARSE_PROMPT,
};
pub use inference::{clean_data, infer_schema, InferenceConfig};
pub use intent::resolve_intent;

#[cfg(feature = "openai")]
pub use ai::OpenAiChat;

// Re-export testing utilities
pub use testing::MockChat;
