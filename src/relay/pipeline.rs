//! Relay pipeline

use crate::conversation::{latest_user_text, Conversation, Message};
use crate::error::ProviderError;
use crate::personas::PersonaId;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::relay::StreamEvent;
use crate::routing::{IntentRouter, RoutingDecision};
use futures::{stream, Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Sampling temperature used unless configured otherwise
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Event sent when no provider client could be built at start-up
pub const INIT_ERROR_MESSAGE: &str =
    "[Error] AI Service client not initialized. Check API keys and provider settings.";

pub const AUTH_ERROR_PREFIX: &str = "[Error] Authentication Error:";

pub const GENERIC_ERROR_PREFIX: &str = "[Error] An unexpected error occurred:";

/// Finite, not restartable sequence of events for one request
pub type RelayStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Connects the intent router to a completion provider
pub struct Relay {
    router: Arc<IntentRouter>,
    provider: Option<Arc<dyn CompletionProvider>>,
    default_model: String,
    temperature: f32,
    idle_timeout: Option<Duration>,
}

impl Relay {
    /// Create a relay; `provider` is `None` when the client failed to initialize
    pub fn new(
        router: Arc<IntentRouter>,
        provider: Option<Arc<dyn CompletionProvider>>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            router,
            provider,
            default_model: default_model.into(),
            temperature: DEFAULT_TEMPERATURE,
            idle_timeout: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Bound the wait for the provider's response and for each later chunk
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout.filter(|d| !d.is_zero());
        self
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Whether a provider client is available
    pub fn is_ready(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Model used for a request: a non-blank override, else the default
    pub fn effective_model(&self, model_override: Option<&str>) -> String {
        match model_override.map(str::trim) {
            Some(model) if !model.is_empty() => model.to_string(),
            _ => self.default_model.clone(),
        }
    }

    /// Relay one conversation
    pub fn relay(&self, conversation: Conversation, model_override: Option<String>) -> RelayStream {
        let Some(provider) = self.provider.clone() else {
            tracing::warn!("Chat request received but no provider client is available");
            return single(StreamEvent::new(INIT_ERROR_MESSAGE));
        };

        let profile = match self.router.route(latest_user_text(&conversation)) {
            RoutingDecision::OutOfScope(refusal) => {
                tracing::info!("Input out of scope, replying with refusal");
                return single(StreamEvent::new(refusal));
            }
            RoutingDecision::Persona(profile) => profile,
        };

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(Message::system(profile.instruction_text.clone()));
        messages.extend(conversation);

        let request = CompletionRequest {
            model: self.effective_model(model_override.as_deref()),
            messages,
            temperature: self.temperature,
        };

        Box::pin(completion_events(
            provider,
            request,
            profile.id,
            self.idle_timeout,
        ))
    }
}

fn single(event: StreamEvent) -> RelayStream {
    Box::pin(stream::once(async move { event }))
}

/// Text of the event reporting a provider failure
pub(crate) fn error_event(error: &ProviderError) -> StreamEvent {
    if error.is_authentication() {
        StreamEvent::new(format!(
            "{} Invalid API Key. Please check your GRAVITAS_AI_KEY (for OpenAI) or GROQ_API_KEY \
             (for Groq) in the environment settings. Details: {}",
            AUTH_ERROR_PREFIX, error
        ))
    } else {
        StreamEvent::new(format!("{} {}: {}", GENERIC_ERROR_PREFIX, error.kind(), error))
    }
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, ProviderError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ProviderError::Timeout(limit.as_secs())),
        None => Ok(fut.await),
    }
}

fn completion_events(
    provider: Arc<dyn CompletionProvider>,
    request: CompletionRequest,
    persona: PersonaId,
    idle_timeout: Option<Duration>,
) -> impl Stream<Item = StreamEvent> + Send {
    async_stream::stream! {
        let model = request.model.clone();
        tracing::info!(
            persona = %persona,
            model = %model,
            provider = provider.name(),
            "Stream started"
        );

        let opened = within(idle_timeout, provider.stream_completion(request))
            .await
            .and_then(|result| result);
        let mut chunks = match opened {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::error!(
                    persona = %persona,
                    model = %model,
                    kind = e.kind(),
                    "Provider call failed: {}",
                    e
                );
                yield error_event(&e);
                return;
            }
        };

        let mut units = 0usize;
        let mut sent = 0usize;
        loop {
            match within(idle_timeout, chunks.next()).await {
                Ok(Some(Ok(chunk))) => {
                    units += 1;
                    if let Some(text) = chunk.delta.filter(|d| !d.is_empty()) {
                        sent += 1;
                        yield StreamEvent::new(text);
                    }
                }
                Ok(Some(Err(e))) | Err(e) => {
                    tracing::warn!(
                        persona = %persona,
                        model = %model,
                        chunks = sent,
                        kind = e.kind(),
                        "Provider stream failed: {}",
                        e
                    );
                    yield error_event(&e);
                    return;
                }
                Ok(None) => break,
            }
        }

        tracing::info!(
            persona = %persona,
            model = %model,
            units,
            chunks = sent,
            "Stream finished"
        );
    }
}
