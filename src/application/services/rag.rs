use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::EmbeddingService, Document, DocumentChunk, DomainError, SearchResult, VectorIndex,
};

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    chunk_size: usize,
    default_top_k: usize,
}

impl RagService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, chunk_size: usize, default_top_k: usize) -> Self {
        Self {
            embedding,
            chunk_size,
            default_top_k,
        }
    }

    /// Chunks and embeds `documents` into a fresh index.
    #[instrument(
        skip(self, documents),
        fields(documents = documents.len(), model = self.embedding.model())
    )]
    pub async fn build_index(&self, documents: &[Document]) -> Result<VectorIndex, DomainError> {
        let chunks: Vec<DocumentChunk> = documents
            .iter()
            .flat_map(|doc| doc.chunks(self.chunk_size))
            .collect();

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedding.embed_batch(&texts).await?
        };

        tracing::info!(chunks = chunks.len(), "index built");
        VectorIndex::new(chunks, embeddings, documents.len())
    }

    #[instrument(skip(self, index), fields(top_k = self.default_top_k))]
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        query: &str,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        Ok(index.search(&embedding, self.default_top_k))
    }
}
