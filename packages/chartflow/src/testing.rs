//! Testing utilities including a mock ChatModel.
//!
//! Useful for exercising the pipeline without real LLM calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{ChatError, ChatResult};
use crate::traits::{ChatModel, ChatRequest, ChatResponse};

/// Reply a model gives when the text holds no structured data.
pub const NO_DATA_REPLY: &str = r#"{"hasData": false}"#;

/// A mock chat model with deterministic, configurable replies.
///
/// Resolution order per call: scripted queue, then substring-keyed replies
/// against the first user message, then the default reply
/// ([`NO_DATA_REPLY`] unless overridden). A failing mock errors instead.
#[derive(Default)]
pub struct MockChat {
    /// Scripted replies consumed in order
    queue: Arc<RwLock<VecDeque<String>>>,

    /// Replies keyed by a substring of the user message
    keyed: Arc<RwLock<HashMap<String, String>>>,

    /// Default reply when nothing else matches
    default_reply: Arc<RwLock<Option<String>>>,

    /// When true, every call fails with a service error
    fail: Arc<RwLock<bool>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockChatCall>>>,
}

/// Record of one call made to the mock.
#[derive(Debug, Clone)]
pub struct MockChatCall {
    pub system: String,
    pub user_content: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl MockChat {
    /// Create a mock whose default reply declines (`{"hasData": false}`).
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that always reports no structured data.
    pub fn always_miss() -> Self {
        Self::default()
    }

    /// Queue a scripted reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.queue.write().unwrap().push_back(content.into());
        self
    }

    /// Reply with `content` whenever the user message contains `key`.
    pub fn with_keyed_response(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.keyed.write().unwrap().insert(key.into(), content.into());
        self
    }

    /// Override the default reply.
    pub fn with_default_reply(self, content: impl Into<String>) -> Self {
        *self.default_reply.write().unwrap() = Some(content.into());
        self
    }

    /// Make every call fail with a service error.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap() = true;
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<MockChatCall> {
        self.calls.read().unwrap().clone()
    }

    /// Clear the call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatResponse> {
        let user_content = request
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();

        self.calls.write().unwrap().push(MockChatCall {
            system: request.system.clone(),
            user_content: user_content.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        });

        if *self.fail.read().unwrap() {
            return Err(ChatError::Service {
                status: 503,
                message: "mock service unavailable".to_string(),
            });
        }

        if let Some(scripted) = self.queue.write().unwrap().pop_front() {
            return Ok(ChatResponse { content: scripted });
        }

        if let Some(content) = self
            .keyed
            .read()
            .unwrap()
            .iter()
            .find(|(key, _)| user_content.contains(key.as_str()))
            .map(|(_, content)| content.clone())
        {
            return Ok(ChatResponse { content });
        }

        let content = self
            .default_reply
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| NO_DATA_REPLY.to_string());
        Ok(ChatResponse { content })
    }
}
