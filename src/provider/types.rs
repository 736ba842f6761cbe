//! Provider API request and response types.
//!
//! Both providers accept the same request shape (model, token budget,
//! a single user message) but answer with different JSON. The response
//! side is modeled as one type per provider plus [`ProviderResponse`],
//! the tagged union whose [`ProviderResponse::into_text`] is the only
//! place the two shapes are reconciled into plain text.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Completion request accepted by both provider APIs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages; the pipeline always sends exactly one.
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a new completion request.
    #[must_use]
    pub fn new(model: impl Into<String>, max_tokens: u32, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages,
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from the Anthropic messages API.
///
/// Completion text is nested in `content[].text`; fields this crate does
/// not consume (id, model, usage) are ignored on deserialization.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnthropicResponse {
    /// Content blocks in the response.
    pub content: Vec<AnthropicBlock>,
}

/// Content block in an Anthropic response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum AnthropicBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// Any block type this crate does not consume.
    #[serde(other)]
    Other,
}

impl AnthropicBlock {
    /// Get text content if this is a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}

/// Response from the OpenAI chat completions API.
///
/// Completion text is nested in `choices[0].message.content`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OpenAiResponse {
    /// Completion choices; the first is used.
    pub choices: Vec<OpenAiChoice>,
}

/// A single completion choice in an OpenAI response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OpenAiChoice {
    /// The completion message.
    pub message: OpenAiChoiceMessage,
}

/// Message within an OpenAI completion choice.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OpenAiChoiceMessage {
    /// Completion text; absent for non-text completions.
    pub content: Option<String>,
}

/// A provider response awaiting normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// Anthropic-shaped response.
    Anthropic(AnthropicResponse),
    /// OpenAI-shaped response.
    OpenAi(OpenAiResponse),
}

impl ProviderResponse {
    /// Normalize the provider-specific shape into plain completion text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnexpectedResponse`] when the response
    /// carries no usable text (no content blocks, no choices, or a
    /// missing message body).
    pub fn into_text(self) -> Result<String, ProviderError> {
        match self {
            Self::Anthropic(response) => {
                let text = response
                    .content
                    .iter()
                    .filter_map(AnthropicBlock::as_text)
                    .collect::<Vec<_>>()
                    .join("\n");
                if text.trim().is_empty() {
                    return Err(ProviderError::UnexpectedResponse {
                        message: "response contained no text content".to_string(),
                    });
                }
                Ok(text)
            }
            Self::OpenAi(response) => {
                let choice =
                    response
                        .choices
                        .into_iter()
                        .next()
                        .ok_or_else(|| ProviderError::UnexpectedResponse {
                            message: "response contained no choices".to_string(),
                        })?;
                match choice.message.content {
                    Some(text) if !text.trim().is_empty() => Ok(text),
                    _ => Err(ProviderError::UnexpectedResponse {
                        message: "choice carried no message content".to_string(),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ChatRequest tests
    #[test]
    fn test_chat_request_new() {
        let req = ChatRequest::new("gpt-4", 8192, vec![ChatMessage::user("Hello")]);
        assert_eq!(req.model, "gpt-4");
        assert_eq!(req.max_tokens, 8192);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn test_chat_request_serialization() {
        let req = ChatRequest::new("claude-sonnet-4-20250514", 8192, vec![ChatMessage::user("Hi")]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"model\":\"claude-sonnet-4-20250514\""));
        assert!(json.contains("\"max_tokens\":8192"));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Hi\""));
    }

    #[test]
    fn test_chat_message_user() {
        let msg = ChatMessage::user("Convert my workflow");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "Convert my workflow");
    }

    // Anthropic response tests
    #[test]
    fn test_anthropic_response_deserialization() {
        let json = r#"{
            "id": "msg_123",
            "content": [{"type": "text", "text": "Hello"}],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 10, "output_tokens": 5},
            "stop_reason": "end_turn"
        }"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].as_text(), Some("Hello"));
    }

    #[test]
    fn test_anthropic_block_unknown_type_tolerated() {
        let json = r#"{"content": [
            {"type": "thinking", "thinking": "hmm"},
            {"type": "text", "text": "answer"}
        ]}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.content[0].as_text(), None);
        assert_eq!(response.content[1].as_text(), Some("answer"));
    }

    #[test]
    fn test_anthropic_into_text_joins_blocks() {
        let response = ProviderResponse::Anthropic(AnthropicResponse {
            content: vec![
                AnthropicBlock::Text {
                    text: "part one".to_string(),
                },
                AnthropicBlock::Text {
                    text: "part two".to_string(),
                },
            ],
        });
        assert_eq!(response.into_text().unwrap(), "part one\npart two");
    }

    #[test]
    fn test_anthropic_into_text_empty_content_fails() {
        let response = ProviderResponse::Anthropic(AnthropicResponse { content: vec![] });
        let err = response.into_text().unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
    }

    #[test]
    fn test_anthropic_into_text_only_non_text_blocks_fails() {
        let response = ProviderResponse::Anthropic(AnthropicResponse {
            content: vec![AnthropicBlock::Other],
        });
        let err = response.into_text().unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
    }

    // OpenAI response tests
    #[test]
    fn test_openai_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let response: OpenAiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_openai_into_text_uses_first_choice() {
        let response = ProviderResponse::OpenAi(OpenAiResponse {
            choices: vec![
                OpenAiChoice {
                    message: OpenAiChoiceMessage {
                        content: Some("first".to_string()),
                    },
                },
                OpenAiChoice {
                    message: OpenAiChoiceMessage {
                        content: Some("second".to_string()),
                    },
                },
            ],
        });
        assert_eq!(response.into_text().unwrap(), "first");
    }

    #[test]
    fn test_openai_into_text_no_choices_fails() {
        let response = ProviderResponse::OpenAi(OpenAiResponse { choices: vec![] });
        let err = response.into_text().unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
    }

    #[test]
    fn test_openai_into_text_null_content_fails() {
        let response = ProviderResponse::OpenAi(OpenAiResponse {
            choices: vec![OpenAiChoice {
                message: OpenAiChoiceMessage { content: None },
            }],
        });
        let err = response.into_text().unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { .. }));
    }

    // Normalization equivalence: the same completion text through either
    // provider shape yields identical plain text.
    #[test]
    fn test_equivalent_responses_normalize_identically() {
        let text = "{\"script\": \"import pandas as pd\"}";

        let anthropic: AnthropicResponse = serde_json::from_str(&format!(
            r#"{{"content": [{{"type": "text", "text": {}}}]}}"#,
            serde_json::to_string(text).unwrap()
        ))
        .unwrap();
        let openai: OpenAiResponse = serde_json::from_str(&format!(
            r#"{{"choices": [{{"message": {{"role": "assistant", "content": {}}}}}]}}"#,
            serde_json::to_string(text).unwrap()
        ))
        .unwrap();

        let from_anthropic = ProviderResponse::Anthropic(anthropic).into_text().unwrap();
        let from_openai = ProviderResponse::OpenAi(openai).into_text().unwrap();
        assert_eq!(from_anthropic, from_openai);
        assert_eq!(from_anthropic, text);
    }
}
