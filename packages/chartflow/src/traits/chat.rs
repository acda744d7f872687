//! ChatModel trait for the single asynchronous boundary in the pipeline.
//!
//! Implementations wrap specific chat-completion providers and handle the
//! transport details. The trait imposes no internal timeout; callers are
//! expected to wrap the pipeline in an overall request timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatResult;

/// One message in a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// An assistant-role message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System instruction governing the reply format
    pub system: String,

    pub messages: Vec<ChatMessage>,

    pub temperature: f32,

    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build a request with the pipeline's default sampling parameters.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            messages: Vec::new(),
            temperature: 0.1,
            max_tokens: 1000,
        }
    }

    /// Append a message.
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A chat-completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Chat-completion abstraction.
///
/// The prompt extractor is the only consumer; it recovers from every
/// [`crate::error::ChatError`] locally by falling through to the regex
/// strategies.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one chat completion.
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatResponse>;
}
