//! Prompt data extractor: AI-backed structured parse with regex fallback.
//!
//! Two tiers, first success wins:
//!
//! 1. A chat completion instructed to emit strict JSON
//!    (`{"hasData": bool, "xAxisKey"?, "yAxisKeys"?, "data"?}`). Any chat
//!    failure, invalid JSON, or `hasData: false` is a *miss*, recovered
//!    locally — never a user-facing error.
//! 2. The regex strategy chain in [`crate::extract::patterns`].
//!
//! Returns `None` when neither tier yields a row: a legitimate "no
//! structured data present" outcome, distinct from an extraction failure.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::patterns::extract_with_patterns;
use crate::traits::{ChatMessage, ChatModel, ChatRequest};
use crate::types::{DataRow, DataValue, ExtractedData, ExtractionMethod};

const AI_DEFAULT_CONFIDENCE: f32 = 0.8;

/// System instruction for the structured parse.
pub const DATA_PARSE_PROMPT: &str = r#"You extract tabular data from user text for charting.

Reply with strict JSON only, no prose, no markdown fences:
{
    "hasData": true | false,
    "xAxisKey": "name of the category/time field",
    "yAxisKeys": ["names of the numeric fields"],
    "data": [{"field": value, ...}, ...],
    "confidence": 0.0 to 1.0
}

Rules:
- "hasData" is false when the text contains no literal data values.
- Every object in "data" uses the same field names.
- Numbers must be JSON numbers, not strings.
- Do not invent values that are not present in the text."#;

/// The AI's structured-parse reply, validated before use.
///
/// Modeled as an explicit discriminated result: `hasData` decides whether
/// the optional fields are meaningful. Field presence is never trusted
/// implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiParseResponse {
    #[serde(rename = "hasData")]
    pub has_data: bool,

    #[serde(rename = "xAxisKey", default)]
    pub x_axis_key: Option<String>,

    #[serde(rename = "yAxisKeys", default)]
    pub y_axis_keys: Option<Vec<String>>,

    #[serde(default)]
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,

    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Extracts a row set from free text.
pub struct PromptExtractor<C: ChatModel> {
    chat: C,
}

impl<C: ChatModel> PromptExtractor<C> {
    /// Create an extractor backed by the given chat model.
    pub fn new(chat: C) -> Self {
        Self { chat }
    }

    /// Extract a row set from a prompt.
    ///
    /// `None` means no structured data was present in either tier.
    pub async fn extract(&self, prompt: &str) -> Option<ExtractedData> {
        if let Some(extracted) = self.try_ai_parse(prompt).await {
            return Some(extracted);
        }
        extract_with_patterns(prompt)
    }

    async fn try_ai_parse(&self, prompt: &str) -> Option<ExtractedData> {
        let request = ChatRequest::new(DATA_PARSE_PROMPT).with_message(ChatMessage::user(prompt));

        let response = match self.chat.chat(&request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "chat parse unavailable, falling back to patterns");
                return None;
            }
        };

        let parsed = match parse_ai_response(&response.content) {
            Some(parsed) => parsed,
            None => {
                debug!("chat reply was not valid JSON, falling back to patterns");
                return None;
            }
        };

        if !parsed.has_data || parsed.data.is_empty() {
            debug!("chat reported no structured data");
            return None;
        }

        let data: Vec<DataRow> = parsed
            .data
            .iter()
            .map(|object| {
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), DataValue::from_json(value)))
                    .collect()
            })
            .collect();

        let confidence = parsed
            .confidence
            .unwrap_or(AI_DEFAULT_CONFIDENCE)
            .clamp(0.0, 1.0);

        Some(ExtractedData {
            data,
            confidence,
            extraction_method: ExtractionMethod::AiParsing,
            warnings: Vec::new(),
        })
    }
}

/// Parse the chat reply, tolerating markdown code fences.
pub fn parse_ai_response(content: &str) -> Option<AiParseResponse> {
    serde_json::from_str(strip_code_fences(content)).ok()
}

/// Strip a surrounding markdown code fence (```json ... ```), if present.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChat;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_ai_response_rejects_prose() {
        assert!(parse_ai_response("Sure! Here is your data.").is_none());
    }

    #[tokio::test]
    async fn test_ai_parse_success() {
        let chat = MockChat::new().with_response(
            r#"```json
{"hasData": true, "xAxisKey": "name", "yAxisKeys": ["value"],
 "data": [{"name": "A", "value": 60}, {"name": "B", "value": 40}],
 "confidence": 0.92}
```"#,
        );
        let extractor = PromptExtractor::new(chat);

        let extracted = extractor.extract("A is 60 and B is 40").await.unwrap();
        assert_eq!(extracted.extraction_method, ExtractionMethod::AiParsing);
        assert_eq!(extracted.data.len(), 2);
        assert_eq!(extracted.confidence, 0.92);
        assert_eq!(extracted.data[0]["value"], DataValue::Number(60.0));
    }

    #[tokio::test]
    async fn test_ai_miss_falls_back_to_patterns() {
        let chat = MockChat::always_miss();
        let extractor = PromptExtractor::new(chat);

        let extracted = extractor
            .extract("Beijing[22,23,24], Shanghai[25,26,27]")
            .await
            .unwrap();
        assert_eq!(extracted.extraction_method, ExtractionMethod::RegexPattern);
        assert_eq!(extracted.data.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_failure_recovered_locally() {
        let chat = MockChat::new().failing();
        let extractor = PromptExtractor::new(chat);

        let extracted = extractor.extract("sales: 10, 20, 30").await.unwrap();
        assert_eq!(extracted.extraction_method, ExtractionMethod::RegexPattern);
    }

    #[tokio::test]
    async fn test_invalid_json_falls_through() {
        let chat = MockChat::new().with_response("not json at all");
        let extractor = PromptExtractor::new(chat);

        let extracted = extractor.extract("a[1,2] b[3,4]").await.unwrap();
        assert_eq!(extracted.extraction_method, ExtractionMethod::RegexPattern);
    }

    #[tokio::test]
    async fn test_no_data_anywhere_returns_none() {
        let chat = MockChat::always_miss();
        let extractor = PromptExtractor::new(chat);
        assert!(extractor.extract("draw something pretty").await.is_none());
    }

    #[tokio::test]
    async fn test_has_data_without_rows_is_a_miss() {
        let chat = MockChat::new().with_response(r#"{"hasData": true, "data": []}"#);
        let extractor = PromptExtractor::new(chat);
        assert!(extractor.extract("nothing here").await.is_none());
    }
}
