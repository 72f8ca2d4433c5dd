//! Gravitas configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Gravitas configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GravitasConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any origin)
    pub cors_origins: Vec<String>,

    /// Directory of static assets served for unknown paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            cors_origins: Vec::new(),
            static_dir: None,
        }
    }
}

/// Supported completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Groq,
}

impl ProviderKind {
    /// Base URL of the provider's OpenAI-compatible API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Model used when neither the config nor the request names one
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Groq => "llama3-8b-8192",
        }
    }

    /// Environment variable holding the API key
    pub fn default_api_key_ref(&self) -> &'static str {
        match self {
            Self::OpenAi => "GRAVITAS_AI_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }

    /// Environment variable overriding the default model
    pub fn model_env_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_MODEL",
            Self::Groq => "GROQ_MODEL",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Groq => write!(f, "groq"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            other => Err(Error::Config(format!("unknown provider: {}", other))),
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider to call
    pub kind: ProviderKind,

    /// Name of the environment variable holding the API key
    pub api_key_ref: String,

    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Default model id
    pub default_model: String,

    /// Sampling temperature sent with every completion
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum wait for the next stream chunk in seconds (0 = unbounded)
    #[serde(default = "default_stream_idle_timeout")]
    pub stream_idle_timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_stream_idle_timeout() -> u64 {
    60
}

impl ProviderConfig {
    /// Defaults for the given provider
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key_ref: kind.default_api_key_ref().to_string(),
            base_url: None,
            default_model: kind.default_model().to_string(),
            temperature: default_temperature(),
            connect_timeout_secs: default_connect_timeout(),
            stream_idle_timeout_secs: default_stream_idle_timeout(),
        }
    }

    /// Base URL, falling back to the provider's public endpoint
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_kind(ProviderKind::OpenAi)
    }
}

impl GravitasConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load from `path` if given, otherwise start from defaults, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `PROVIDER` switches provider and resets provider-specific defaults;
    /// values other than `openai` and `groq` select OpenAI with a warning.
    /// `HOST`/`PORT` override the bind address and the provider's model
    /// variable (`OPENAI_MODEL` or `GROQ_MODEL`) overrides the default model.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("PROVIDER").filter(|v| !v.trim().is_empty()) {
            let kind = provider.parse::<ProviderKind>().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, ProviderKind::OpenAi);
                ProviderKind::OpenAi
            });
            if kind != self.provider.kind {
                let previous =
                    std::mem::replace(&mut self.provider, ProviderConfig::for_kind(kind));
                self.provider.temperature = previous.temperature;
                self.provider.connect_timeout_secs = previous.connect_timeout_secs;
                self.provider.stream_idle_timeout_secs = previous.stream_idle_timeout_secs;
            }
        }

        let model_var = self.provider.kind.model_env_var();
        if let Some(model) = lookup(model_var).filter(|v| !v.trim().is_empty()) {
            self.provider.default_model = model;
        }

        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", port)))?;
        }

        Ok(())
    }
}

/// Resolve the provider API key from the environment.
///
/// `api_key_ref` names an environment variable; we try the exact name, then
/// the UPPER_CASE form. Empty values count as missing.
pub fn resolve_api_key_from_env(provider: &ProviderConfig) -> Option<String> {
    resolve_api_key(provider, |key| std::env::var(key).ok())
}

fn resolve_api_key<F>(provider: &ProviderConfig, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&provider.api_key_ref)
        .or_else(|| lookup(&provider.api_key_ref.to_uppercase()))
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
