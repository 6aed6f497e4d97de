//! Command generator abstraction

use async_trait::async_trait;

/// Failures at the model boundary. These never propagate past
/// [`crate::llm::generate_or_error`]; they exist so callers that want the
/// distinction (tests, diagnostics) can match on it.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("model endpoint not configured")]
    EndpointNotConfigured,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Anything that can turn a natural-language query into a shell command
#[async_trait]
pub trait CommandGenerator: Send + Sync {
    async fn generate(&self, query: &str) -> Result<String, GeneratorError>;
}
