//! Model collaborator
//!
//! Turns a natural-language query into a raw shell command through an
//! OpenAI-compatible chat-completions endpoint. The rest of the core never
//! sees a transport error: failures are rendered as an `Error:`-prefixed
//! string, which callers treat as non-actionable and never classify or
//! dispatch.

pub mod openai_compatible;
pub mod provider;

pub use openai_compatible::OpenAiCompatibleClient;
pub use provider::{CommandGenerator, GeneratorError};

/// Prefix marking a non-actionable reply in place of a generated command
pub const ERROR_PREFIX: &str = "Error:";

/// First line of a model reply: the raw command that gets classified and,
/// if approved, executed
pub fn first_line(reply: &str) -> &str {
    reply.lines().next().unwrap_or("")
}

/// Invoke the generator and fold any failure into the `Error:` string
/// contract. The successful reply is trimmed; the first line is what callers
/// classify and execute.
pub async fn generate_or_error(generator: &dyn CommandGenerator, query: &str) -> String {
    match generator.generate(query).await {
        Ok(reply) => reply.trim().to_string(),
        Err(err) => format!("{ERROR_PREFIX} {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl CommandGenerator for FailingGenerator {
        async fn generate(&self, _query: &str) -> Result<String, GeneratorError> {
            Err(GeneratorError::EndpointNotConfigured)
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl CommandGenerator for EchoGenerator {
        async fn generate(&self, query: &str) -> Result<String, GeneratorError> {
            Ok(format!("  echo {query}\n"))
        }
    }

    #[tokio::test]
    async fn failures_become_error_strings() {
        let reply = generate_or_error(&FailingGenerator, "list files").await;
        assert!(reply.starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn successful_replies_are_trimmed() {
        let reply = generate_or_error(&EchoGenerator, "hi").await;
        assert_eq!(reply, "echo hi");
    }
}
