//! Test doubles for [`CompletionProvider`]

use crate::error::ProviderError;
use crate::provider::{CompletionChunk, CompletionProvider, CompletionRequest, CompletionStream};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type ScriptItem = std::result::Result<CompletionChunk, ProviderError>;

/// Replays a fixed script and records every request it receives
pub struct ScriptedProvider {
    items: Vec<ScriptItem>,
    open_error: Option<ProviderError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Yield `items` in order, then end
    pub fn new(items: Vec<ScriptItem>) -> Self {
        Self {
            items,
            open_error: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Yield each text as a delta
    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(CompletionChunk::text(*t))).collect())
    }

    /// Fail before producing any unit
    pub fn failing(error: ProviderError) -> Self {
        Self {
            items: Vec::new(),
            open_error: Some(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }
        Ok(Box::pin(stream::iter(self.items.clone())))
    }
}

/// Fails the test if the relay ever calls it
pub struct UnreachableProvider;

#[async_trait]
impl CompletionProvider for UnreachableProvider {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError> {
        panic!("provider must not be called, got request for {}", request.model);
    }
}

/// Sends one delta and then never produces another unit
pub struct StalledProvider;

#[async_trait]
impl CompletionProvider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn stream_completion(
        &self,
        _request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError> {
        let first = stream::iter(vec![Ok(CompletionChunk::text("thinking"))]);
        Ok(Box::pin(first.chain(stream::pending())))
    }
}

/// Like [`StalledProvider`], but records when the caller releases its stream
#[derive(Default)]
pub struct DropTrackingProvider {
    dropped: Arc<AtomicBool>,
}

impl DropTrackingProvider {
    /// Whether a stream handed out by this provider has been dropped
    pub fn stream_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompletionProvider for DropTrackingProvider {
    fn name(&self) -> &str {
        "drop-tracking"
    }

    async fn stream_completion(
        &self,
        _request: CompletionRequest,
    ) -> std::result::Result<CompletionStream, ProviderError> {
        let flag = DropFlag(self.dropped.clone());
        let first = stream::iter(vec![Ok(CompletionChunk::text("thinking"))]);
        let stalled = first.chain(stream::pending()).map(move |item| {
            let _held = &flag;
            item
        });
        Ok(Box::pin(stalled))
    }
}
