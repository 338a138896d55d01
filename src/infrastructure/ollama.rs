use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::DomainError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

/// HTTP handle to an Ollama-compatible model server.
///
/// The base URL is used as given; no request carries a timeout.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, DomainError> {
        let url = self.endpoint("/api/generate");
        debug!(%url, model, "generate");

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };
        let response = self.post(&url, &request).await?;
        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("Failed to decode generate response: {e}")))?;

        Ok(body.response)
    }

    pub async fn embed(&self, model: &str, prompt: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.endpoint("/api/embeddings");
        debug!(%url, model, bytes = prompt.len(), "embeddings");

        let request = EmbeddingsRequest { model, prompt };
        let response = self.post(&url, &request).await?;
        let body: EmbeddingsResponse = response.json().await.map_err(|e| {
            DomainError::external(format!("Failed to decode embeddings response: {e}"))
        })?;

        if body.embedding.is_empty() {
            return Err(DomainError::external("Embeddings response was empty"));
        }
        Ok(body.embedding)
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Response, DomainError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::external(format!(
                "{url} returned {status}: {}",
                detail.trim()
            )));
        }
        Ok(response)
    }
}
