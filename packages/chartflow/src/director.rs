//! Director: sequences extraction → intent → generation.
//!
//! Single entry point [`ChartPipeline::generate_chart`]. Any stage's error
//! short-circuits the remaining stages and lands on the result object; the
//! result always carries `success`, so callers never distinguish exceptions
//! from typed failures. No stage result is cached or retried — the pipeline
//! is synchronous and idempotent given the same input, and retries belong to
//! the caller. Concurrent invocations are independent; the pipeline holds no
//! shared mutable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::chart::{ChartGenerator, GeneratedChart};
use crate::error::{ChartError, ErrorKind, Result, Stage};
use crate::extract::{extract_from_file, normalize, PromptExtractor};
use crate::inference::InferenceConfig;
use crate::intent::resolve_intent;
use crate::traits::ChatModel;
use crate::types::{ChartConfig, ChartType, DataRow, DataSource};

/// Pipeline-wide tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub inference: InferenceConfig,

    /// Quality-score floor below which a dataset fails validation
    pub min_quality_score: f32,

    /// Insight cap passed to the generator
    pub max_insights: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            min_quality_score: 0.3,
            max_insights: crate::chart::MAX_INSIGHTS,
        }
    }
}

/// An uploaded file: name (drives dispatch) plus raw bytes.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    /// Create a file input.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One chart-generation request.
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    /// The user's free-text prompt
    pub prompt: String,

    /// Optional uploaded file; wins over the prompt when present
    pub file: Option<FileInput>,

    /// Explicit chart type, overriding the heuristics (still validated)
    pub chart_type: Option<ChartType>,
}

impl ChartRequest {
    /// A prompt-only request.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Attach an uploaded file.
    pub fn with_file(mut self, file: FileInput) -> Self {
        self.file = Some(file);
        self
    }

    /// Force a chart type.
    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = Some(chart_type);
        self
    }
}

/// Request-level metadata on the final result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "dataSource")]
    pub data_source: Option<DataSource>,

    /// Wall-clock time of the whole request, in milliseconds
    #[serde(rename = "processingTime")]
    pub processing_time_ms: u64,

    pub confidence: f32,
}

/// The sole interface surface chart-rendering consumers depend on.
///
/// Shape is stable regardless of which extraction path produced the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartGenerationResult {
    pub success: bool,

    #[serde(rename = "chartType", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,

    pub data: Vec<DataRow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub insights: Vec<String>,

    pub metadata: ResultMetadata,

    /// Human-readable failure text, present iff `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable failure kind, present iff `success` is false
    #[serde(rename = "errorKind", skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// Sequences extraction → intent → generation.
pub struct ChartPipeline<C: ChatModel> {
    extractor: PromptExtractor<C>,
    generator: ChartGenerator,
    config: PipelineConfig,
}

impl<C: ChatModel> ChartPipeline<C> {
    /// Create a pipeline with default configuration.
    pub fn new(chat: C) -> Self {
        Self::with_config(chat, PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(chat: C, config: PipelineConfig) -> Self {
        Self {
            extractor: PromptExtractor::new(chat),
            generator: ChartGenerator::new().with_max_insights(config.max_insights),
            config,
        }
    }

    /// A reference to the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline, converting any stage failure into a uniform
    /// result.
    pub async fn generate_chart(&self, request: &ChartRequest) -> ChartGenerationResult {
        let started = Instant::now();

        match self.run(request).await {
            Ok((chart, source)) => {
                info!(
                    chart_type = %chart.chart_type,
                    rows = chart.data.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "chart generated"
                );
                ChartGenerationResult {
                    success: true,
                    chart_type: Some(chart.chart_type),
                    data: chart.data,
                    config: Some(chart.config),
                    title: Some(chart.title),
                    description: Some(chart.description),
                    insights: chart.insights,
                    metadata: ResultMetadata {
                        generated_at: Utc::now(),
                        data_source: Some(source),
                        processing_time_ms: started.elapsed().as_millis() as u64,
                        confidence: chart.confidence,
                    },
                    error: None,
                    error_kind: None,
                }
            }
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "chart generation failed");
                ChartGenerationResult {
                    success: false,
                    chart_type: request.chart_type,
                    data: Vec::new(),
                    config: None,
                    title: None,
                    description: None,
                    insights: Vec::new(),
                    metadata: ResultMetadata {
                        generated_at: Utc::now(),
                        data_source: None,
                        processing_time_ms: started.elapsed().as_millis() as u64,
                        confidence: 0.0,
                    },
                    error: Some(err.to_string()),
                    error_kind: Some(err.kind()),
                }
            }
        }
    }

    async fn run(&self, request: &ChartRequest) -> Result<(GeneratedChart, DataSource)> {
        let (extracted, source) = match &request.file {
            Some(file) => (
                extract_from_file(&file.name, &file.bytes)?,
                DataSource::File,
            ),
            None => match self.extractor.extract(&request.prompt).await {
                Some(extracted) => (extracted, DataSource::Prompt),
                None => {
                    return Err(ChartError::insufficient_data(
                        Stage::DataExtraction,
                        "no structured data found in the prompt",
                    ))
                }
            },
        };

        let unified = normalize(
            &extracted,
            source,
            &self.config.inference,
            self.config.min_quality_score,
        );
        let intent = resolve_intent(&unified, &request.prompt, request.chart_type)?;
        let chart = self.generator.generate(&intent, &unified)?;

        Ok((chart, source))
    }
}
