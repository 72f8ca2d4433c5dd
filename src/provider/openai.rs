//! OpenAI-compatible streaming chat completions
//!
//! Serves OpenAI and Groq (and any other endpoint speaking the same
//! protocol) by POSTing to `{base_url}/chat/completions` with `stream: true`
//! and decoding the server-sent event stream.

use crate::config::ProviderConfig;
use crate::conversation::Message;
use crate::error::{Error, ProviderError, Result};
use crate::provider::{
    CompletionChunk, CompletionProvider, CompletionRequest, CompletionStream, SseDecoder,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest provider error body echoed back to clients
const MAX_ERROR_BODY: usize = 500;

// ─────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        match (&self.kind, &self.message) {
            (Some(kind), Some(message)) => format!("{} ({})", message, kind),
            (None, Some(message)) => message.clone(),
            (Some(kind), None) => kind.clone(),
            (None, None) => "unknown provider error".to_string(),
        }
    }
}

/// One decoded stream payload
#[derive(Debug, PartialEq)]
enum StreamPayload {
    Chunk(CompletionChunk),
    Done,
}

fn parse_payload(data: &str) -> std::result::Result<StreamPayload, ProviderError> {
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(StreamPayload::Done);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| ProviderError::Decode(format!("invalid stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(ProviderError::Api(error.describe()));
    }

    let delta = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content);

    Ok(StreamPayload::Chunk(CompletionChunk { delta }))
}

/// Pull a readable message out of an error response body
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        return envelope.error.describe();
    }
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Decode an SSE byte stream into completion chunks.
///
/// Ends at `[DONE]`, at end of input, or right after yielding an error.
fn decode_stream<S>(
    bytes: S,
) -> impl Stream<Item = std::result::Result<CompletionChunk, ProviderError>>
where
    S: Stream<Item = reqwest::Result<Bytes>>,
{
    async_stream::stream! {
        let mut bytes = std::pin::pin!(bytes);
        let mut decoder = SseDecoder::new();

        while let Some(next) = bytes.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(ProviderError::from(e));
                    return;
                }
            };

            for data in decoder.push(&chunk) {
                match parse_payload(&data) {
                    Ok(StreamPayload::Chunk(chunk)) => yield Ok(chunk),
                    Ok(StreamPayload::Done) => return,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if let Some(data) = decoder.finish() {
            match parse_payload(&data) {
                Ok(StreamPayload::Chunk(chunk)) => yield Ok(chunk),
                Ok(StreamPayload::Done) => {}
                Err(e) => yield Err(e),
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────────────────────────

/// Streaming client for OpenAI-compatible chat completion APIs
pub struct OpenAiCompatibleProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    /// Create a provider client.
    ///
    /// Only the connect phase is bounded here; the relay bounds the wait for
    /// each stream chunk so long completions are not cut off.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        let name = name.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!(provider = %name, base_url = %base_url, "Completion provider created");

        Ok(Self {
            name,
            base_url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider from configuration and a resolved API key
    pub fn from_config(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "{} API key is empty (set {})",
                config.kind, config.api_key_ref
            )));
        }
        Self::new(
            config.kind.to_string(),
            config.effective_base_url(),
            api_key,
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            stream: true,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            tracing::warn!(
                provider = %self.name,
                status = status.as_u16(),
                "Provider rejected completion request"
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::Authentication(message)
                }
                _ => ProviderError::Status {
                    status: status.as_u16(),
                    body: message,
                },
            });
        }

        Ok(Box::pin(decode_stream(response.bytes_stream())))
    }
}
