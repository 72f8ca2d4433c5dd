//! Request and response types for the chat API

use crate::conversation::{Conversation, Message, Role};
use serde::Serialize;
use serde_json::Value;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: "BAD_REQUEST".to_string(),
                message: message.into(),
            },
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
}

/// A validated `POST /api/chat` body
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Conversation,
    pub model: Option<String>,
}

impl ChatRequest {
    /// Validate a raw request body.
    ///
    /// The body is read leniently: anything that is not JSON counts as an
    /// empty object, and a non-string `model` is ignored.
    pub fn parse(body: &[u8]) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

        let items = match value.get("messages") {
            None | Some(Value::Null) => return Err("No messages provided".to_string()),
            Some(Value::Array(items)) if items.is_empty() => {
                return Err("No messages provided".to_string())
            }
            Some(Value::Array(items)) => items,
            Some(_) => return Err("'messages' must be a list".to_string()),
        };

        let messages = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_message(index, item))
            .collect::<std::result::Result<Conversation, String>>()?;

        let model = value
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { messages, model })
    }
}

fn parse_message(index: usize, item: &Value) -> std::result::Result<Message, String> {
    let object = item
        .as_object()
        .ok_or_else(|| format!("messages[{}] must be an object", index))?;

    let role = object
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("messages[{}].role must be a string", index))?
        .parse::<Role>()
        .map_err(|_| {
            format!(
                "messages[{}].role must be one of system, user, assistant",
                index
            )
        })?;

    let content = object
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("messages[{}].content must be a string", index))?;

    Ok(Message::new(role, content))
}
