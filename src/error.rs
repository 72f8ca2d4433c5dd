//! Gravitas error types

use thiserror::Error;

/// Gravitas error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persona catalog error
    #[error("Persona error: {0}")]
    Persona(String),

    /// Completion provider error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Gateway error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Gravitas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a completion provider.
///
/// Authentication failures are kept apart from everything else so the relay
/// can label them for the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credential rejected by the provider
    #[error("{0}")]
    Authentication(String),

    /// Non-success HTTP status from the provider
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Error object delivered inside the completion stream
    #[error("{0}")]
    Api(String),

    /// Connection or transfer failure
    #[error("{0}")]
    Transport(String),

    /// Unparsable stream payload
    #[error("{0}")]
    Decode(String),

    /// No data from the provider within the idle window
    #[error("no data received from provider for {0}s")]
    Timeout(u64),
}

impl ProviderError {
    /// Short label naming the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "AuthenticationError",
            Self::Status { .. } => "APIStatusError",
            Self::Api(_) => "APIError",
            Self::Transport(_) => "APIConnectionError",
            Self::Decode(_) => "DecodeError",
            Self::Timeout(_) => "APITimeoutError",
        }
    }

    /// Whether the provider rejected the credential
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
