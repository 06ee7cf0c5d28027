/// The text model port: prompt in, raw text out.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// A generative text model.
///
/// Implementations own transport, authentication and response unwrapping.
/// Any non-success, including a reply with no text, is an error.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

