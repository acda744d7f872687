//! Chart generator: validate the intent, preprocess the mapped fields,
//! build the configuration, and produce insights.

pub mod config;
pub mod insights;
pub mod preprocess;
pub mod validate;

use std::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::types::{ChartConfig, ChartIntent, ChartType, DataRow, UnifiedDataStructure};

pub use config::{build_config, DEFAULT_PALETTE};
pub use insights::{generate_insights, MAX_INSIGHTS};
pub use preprocess::{preprocess, series_values, PreprocessedData};
pub use validate::{validate_intent, LINE_MIN_POINTS, PIE_MAX_CATEGORIES};

/// A fully generated chart, ready for the director to wrap into the result.
#[derive(Debug, Clone)]
pub struct GeneratedChart {
    pub chart_type: ChartType,
    pub data: Vec<DataRow>,
    pub config: ChartConfig,
    pub title: String,
    pub description: String,
    pub insights: Vec<String>,

    /// Wall-clock time of this stage, in milliseconds
    pub processing_time_ms: u64,

    /// The intent's confidence, carried through unmodified
    pub confidence: f32,
}

/// Turns a validated intent plus a unified dataset into a chart.
#[derive(Debug, Clone)]
pub struct ChartGenerator {
    max_insights: usize,
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self {
            max_insights: MAX_INSIGHTS,
        }
    }
}

impl ChartGenerator {
    /// Create a generator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of generated insights.
    pub fn with_max_insights(mut self, max: usize) -> Self {
        self.max_insights = max;
        self
    }

    /// Validate, preprocess, configure, and annotate a chart.
    pub fn generate(
        &self,
        intent: &ChartIntent,
        unified: &UnifiedDataStructure,
    ) -> Result<GeneratedChart> {
        let started = Instant::now();

        validate_intent(intent, unified)?;

        let pre = preprocess(intent, unified);
        let config = build_config(intent, unified, &pre);
        let insights = generate_insights(intent, &pre, self.max_insights);

        debug!(
            chart_type = %intent.chart_type,
            rows = pre.rows.len(),
            insights = insights.len(),
            "generated chart"
        );

        Ok(GeneratedChart {
            chart_type: intent.chart_type,
            data: pre.rows,
            config,
            title: intent.suggestions.title.clone(),
            description: intent.suggestions.description.clone(),
            insights,
            processing_time_ms: started.elapsed().as_millis() as u64,
            confidence: intent.confidence,
        })
    }
}
