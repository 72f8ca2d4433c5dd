//! Gateway server implementation

use crate::api::build_app;
use crate::config::GravitasConfig;
use crate::error::{Error, Result};
use crate::gateway::ChatState;
use crate::personas::{PersonaRegistry, PersonasState};
use crate::provider::{CompletionProvider, OpenAiCompatibleProvider};
use crate::relay::Relay;
use crate::routing::IntentRouter;
use axum::Router;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Gravitas HTTP gateway
///
/// Owns the process-wide, read-only context: persona registry, intent
/// router and relay with its provider client.
pub struct Gateway {
    config: GravitasConfig,
    registry: Arc<PersonaRegistry>,
    relay: Arc<Relay>,
}

impl Gateway {
    /// Create a gateway.
    ///
    /// A missing key or a client that fails to build leaves the relay
    /// without a provider; every chat request then gets a single
    /// initialization error event and health reports the failure.
    pub fn new(config: GravitasConfig, api_key: Option<String>) -> Result<Self> {
        let provider = match api_key {
            Some(key) => match OpenAiCompatibleProvider::from_config(&config.provider, key) {
                Ok(provider) => Some(Arc::new(provider) as Arc<dyn CompletionProvider>),
                Err(e) => {
                    tracing::error!("Failed to initialize {} client: {}", config.provider.kind, e);
                    None
                }
            },
            None => {
                tracing::warn!(
                    provider = %config.provider.kind,
                    key = %config.provider.api_key_ref,
                    "API key not set, chat requests will report an initialization error"
                );
                None
            }
        };
        Self::with_provider(config, provider)
    }

    /// Create a gateway around an already constructed provider
    pub fn with_provider(
        config: GravitasConfig,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> Result<Self> {
        let registry = Arc::new(PersonaRegistry::builtin()?);
        let router = Arc::new(IntentRouter::new(registry.clone()));

        let idle_timeout = Duration::from_secs(config.provider.stream_idle_timeout_secs);
        let relay = Relay::new(router, provider, config.provider.default_model.clone())
            .with_temperature(config.provider.temperature)
            .with_idle_timeout(Some(idle_timeout));

        Ok(Self {
            config,
            registry,
            relay: Arc::new(relay),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &GravitasConfig {
        &self.config
    }

    /// Get the persona registry
    pub fn registry(&self) -> &Arc<PersonaRegistry> {
        &self.registry
    }

    /// Get the relay
    pub fn relay(&self) -> &Arc<Relay> {
        &self.relay
    }

    /// Build the HTTP application
    pub fn app(&self) -> Router {
        build_app(
            ChatState {
                relay: self.relay.clone(),
                provider: self.config.provider.kind.to_string(),
            },
            PersonasState {
                registry: self.registry.clone(),
            },
            &self.config.server,
        )
    }

    /// Get gateway status information
    pub fn status(&self) -> GatewayStatus {
        GatewayStatus {
            provider: self.config.provider.kind.to_string(),
            model: self.relay.default_model().to_string(),
            client_ready: self.relay.is_ready(),
            personas: self.registry.all().len(),
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = &self.config.server;
        let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
            .await
            .map_err(|e| {
                Error::Gateway(format!("failed to bind {}:{}: {}", server.host, server.port, e))
            })?;

        let status = self.status();
        tracing::info!(
            addr = %listener.local_addr()?,
            provider = %status.provider,
            model = %status.model,
            client_ready = status.client_ready,
            "Gravitas gateway listening"
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Gravitas gateway stopped");
        Ok(())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down...");
        })
        .await
    }
}

/// Gateway status information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    /// Configured provider
    pub provider: String,
    /// Default model
    pub model: String,
    /// Whether the provider client is available
    pub client_ready: bool,
    /// Number of personas in the catalog
    pub personas: usize,
}

/// Builder for Gateway
pub struct GatewayBuilder {
    config: GravitasConfig,
    api_key: Option<String>,
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl GatewayBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: GravitasConfig::default(),
            api_key: None,
            provider: None,
        }
    }

    /// Set the configuration
    pub fn config(mut self, config: GravitasConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the gateway host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    /// Set the gateway port
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the provider API key
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Use this provider instead of building one from the configuration
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the gateway
    pub fn build(self) -> Result<Gateway> {
        match self.provider {
            Some(provider) => Gateway::with_provider(self.config, Some(provider)),
            None => Gateway::new(self.config, self.api_key),
        }
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
