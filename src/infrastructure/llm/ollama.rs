use async_trait::async_trait;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::ollama::OllamaClient;

pub struct OllamaLlm {
    client: OllamaClient,
    model: String,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl LlmService for OllamaLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.client.generate(&self.model, prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
