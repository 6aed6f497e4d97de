//! OpenAI-compatible chat-completions client
//!
//! Works against any server exposing the `/chat/completions` shape, which is
//! what local model runners (LM Studio, llama.cpp, Ollama's compat layer)
//! speak. The endpoint URL comes straight from the config store.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};

use super::provider::{CommandGenerator, GeneratorError};
use crate::config::constants::prompts;

pub struct OpenAiCompatibleClient {
    endpoint: String,
    http_client: HttpClient,
}

impl OpenAiCompatibleClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            http_client: HttpClient::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CommandGenerator for OpenAiCompatibleClient {
    async fn generate(&self, query: &str) -> Result<String, GeneratorError> {
        let request = json!({
            "messages": [
                { "role": "system", "content": prompts::COMMAND_SYSTEM_PROMPT },
                { "role": "user", "content": query },
            ],
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| GeneratorError::Network(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Provider(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| GeneratorError::MalformedResponse(err.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                GeneratorError::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })
    }
}
