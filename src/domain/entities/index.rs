use std::collections::BTreeSet;
use std::path::Path;

use super::{DocumentChunk, Embedding, SearchResult};
use crate::domain::DomainError;

/// An owned, immutable set of embedded chunks.
///
/// An index is built in one go and never mutated afterwards; rebuilding means
/// constructing a new value and dropping the old one.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<(DocumentChunk, Embedding)>,
    document_count: usize,
}

impl VectorIndex {
    pub fn new(
        chunks: Vec<DocumentChunk>,
        embeddings: Vec<Embedding>,
        document_count: usize,
    ) -> Result<Self, DomainError> {
        if chunks.len() != embeddings.len() {
            return Err(DomainError::internal(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        Ok(Self {
            entries: chunks.into_iter().zip(embeddings).collect(),
            document_count,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Distinct source files of the indexed chunks.
    pub fn sources(&self) -> BTreeSet<&Path> {
        self.entries.iter().map(|(chunk, _)| chunk.source()).collect()
    }

    /// Returns the `top_k` chunks most similar to `query`, best first.
    pub fn search(&self, query: &Embedding, top_k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        results
    }
}
