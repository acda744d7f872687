//! Typed errors for the chart pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every pipeline error is
//! tagged with the [`Stage`] that raised it and maps to a closed
//! [`ErrorKind`] taxonomy that survives onto the final result object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The pipeline stage that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Pulling rows out of a prompt or file
    DataExtraction,

    /// Inferring field types and data quality
    SchemaInference,

    /// Choosing a chart type and axis mapping
    IntentResolution,

    /// Validating, preprocessing, and building the chart configuration
    ChartGeneration,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::DataExtraction => "data_extraction",
            Stage::SchemaInference => "schema_inference",
            Stage::IntentResolution => "intent_resolution",
            Stage::ChartGeneration => "chart_generation",
        };
        f.write_str(name)
    }
}

/// Closed error-kind taxonomy exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Empty dataset or too few rows
    InsufficientData,

    /// Unsupported file type, missing field, chart-type constraint violation
    InvalidRequest,

    /// Schema shape unsuitable for the requested chart type
    DataIncompatible,

    /// Unexpected failure, wrapped with the original message
    UnknownError,
}

/// Errors that can occur in the extraction → intent → generation pipeline.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The dataset has no rows, or not enough for the requested chart
    #[error("[{stage}] insufficient data: {message}")]
    InsufficientData { stage: Stage, message: String },

    /// The request asked for something the pipeline cannot honor
    #[error("[{stage}] invalid request: {message}")]
    InvalidRequest { stage: Stage, message: String },

    /// The data's shape is incompatible with the requested chart type
    #[error("[{stage}] data incompatible: {message}")]
    DataIncompatible { stage: Stage, message: String },

    /// Unexpected failure wrapped with its original message
    #[error("[{stage}] unexpected error: {message}")]
    Unknown {
        stage: Stage,
        message: String,
        details: Option<String>,
    },
}

impl ChartError {
    /// Shorthand constructor for [`ChartError::InsufficientData`].
    pub fn insufficient_data(stage: Stage, message: impl Into<String>) -> Self {
        Self::InsufficientData {
            stage,
            message: message.into(),
        }
    }

    /// Shorthand constructor for [`ChartError::InvalidRequest`].
    pub fn invalid_request(stage: Stage, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            stage,
            message: message.into(),
        }
    }

    /// Shorthand constructor for [`ChartError::DataIncompatible`].
    pub fn data_incompatible(stage: Stage, message: impl Into<String>) -> Self {
        Self::DataIncompatible {
            stage,
            message: message.into(),
        }
    }

    /// Wrap an unexpected failure, preserving the original message.
    pub fn unknown(
        stage: Stage,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self::Unknown {
            stage,
            message: message.into(),
            details,
        }
    }

    /// The stage that raised this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InsufficientData { stage, .. }
            | Self::InvalidRequest { stage, .. }
            | Self::DataIncompatible { stage, .. }
            | Self::Unknown { stage, .. } => *stage,
        }
    }

    /// The closed-taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::DataIncompatible { .. } => ErrorKind::DataIncompatible,
            Self::Unknown { .. } => ErrorKind::UnknownError,
        }
    }
}

/// Errors from the chat-completion boundary.
///
/// These never escape the prompt extractor as user-facing errors; a chat
/// failure is recovered locally by falling through to the regex strategies.
#[derive(Debug, Error)]
pub enum ChatError {
    /// API key or credentials missing
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service answered with a non-success status
    #[error("chat service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The service answered but produced no content
    #[error("chat service returned no content")]
    EmptyResponse,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Result type alias for chat-completion operations.
pub type ChatResult<T> = std::result::Result<T, ChatError>;
