use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::{GenerationRequest, StreamChunk};

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response, either as an HTTP status or as an
    /// `error` object inside the stream.
    Api { status: u16, message: String },
    /// Failed to parse the provider's response. Not retryable.
    Parse(String),
    /// The chunk receiver was dropped before the stream finished.
    ChannelClosed,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
            ProviderError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A remote generative-text service.
///
/// Implementations are stateless request/response adapters: conversation
/// state lives in the caller and arrives through `GenerationRequest::history`.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Issues a single request and returns the full reply text.
    /// An empty string means the provider answered with no content.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError>;

    /// Streams a reply, sending chunks to the provided channel in generation
    /// order. Returns once the provider has finished or failed.
    async fn stream_generate(
        &self,
        request: GenerationRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError>;
}
