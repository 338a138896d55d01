use async_trait::async_trait;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::ollama::OllamaClient;

pub struct OllamaEmbedding {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedding {
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
impl EmbeddingService for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        self.client.embed(&self.model, text).await.map(Embedding::new)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
