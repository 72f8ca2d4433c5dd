//! Completion provider abstraction
//!
//! The relay talks to the LLM through [`CompletionProvider`], which exposes a
//! single streaming chat-completion operation. [`OpenAiCompatibleProvider`]
//! implements it for OpenAI and Groq, which share the same wire protocol.

#[cfg(test)]
pub mod mock;
mod openai;
mod sse;

pub use openai::OpenAiCompatibleProvider;
pub use sse::SseDecoder;

use crate::conversation::Message;
use crate::error::ProviderError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Parameters of one streaming completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// One incremental unit from the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionChunk {
    /// Text produced since the previous unit; absent for role-only or
    /// metadata-only units
    pub delta: Option<String>,
}

impl CompletionChunk {
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            delta: Some(delta.into()),
        }
    }

    pub fn empty() -> Self {
        Self { delta: None }
    }
}

/// Lazy, finite sequence of completion units
pub type CompletionStream =
    Pin<Box<dyn Stream<Item = std::result::Result<CompletionChunk, ProviderError>> + Send>>;

/// A remote LLM completion service
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name reported by the health endpoint
    fn name(&self) -> &str;

    /// Start a streaming completion.
    ///
    /// Errors before the first unit (bad credential, non-success status,
    /// connection failure) are returned directly; failures after that are
    /// yielded as stream items.
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError>;
}
