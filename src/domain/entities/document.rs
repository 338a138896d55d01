use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A single file read from the knowledge base directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    pub metadata: serde_json::Value,
    pub loaded_at: DateTime<Utc>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let metadata = serde_json::json!({
            "file_path": path.display().to_string(),
            "file_name": name,
            "file_size": content.len(),
        });

        Self {
            id: Uuid::new_v4(),
            name,
            path,
            content,
            metadata,
            loaded_at: Utc::now(),
        }
    }

    /// Splits the content into chunks tagged with this document's source.
    pub fn chunks(&self, chunk_size: usize) -> Vec<DocumentChunk> {
        let metadata = ChunkMetadata {
            file_name: self.name.clone(),
            file_path: self.path.clone(),
        };
        chunk_content(self.id, &self.content, chunk_size)
            .into_iter()
            .map(|c| c.with_metadata(metadata.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(document_id: Uuid, content: impl Into<String>, chunk_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn source(&self) -> &Path {
        &self.metadata.file_path
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_name: String,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Splits content into chunks by paragraph boundaries.
///
/// Paragraphs are joined until they exceed `chunk_size` bytes, then a new chunk
/// starts. A paragraph that alone exceeds `chunk_size` is cut on character
/// boundaries. Each chunk is assigned a sequential index starting from 0.
pub fn chunk_content(document_id: Uuid, content: &str, chunk_size: usize) -> Vec<DocumentChunk> {
    let chunk_size = chunk_size.max(1);
    let pieces: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .flat_map(|p| split_oversized(p, chunk_size))
        .collect();

    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut chunk_index = 0;

    for piece in pieces {
        let would_exceed =
            !current_chunk.is_empty() && current_chunk.len() + piece.len() + 2 > chunk_size;

        if would_exceed {
            chunks.push(DocumentChunk::new(document_id, &current_chunk, chunk_index));
            current_chunk.clear();
            chunk_index += 1;
        }

        if !current_chunk.is_empty() {
            current_chunk.push_str("\n\n");
        }
        current_chunk.push_str(piece);
    }

    if !current_chunk.is_empty() {
        chunks.push(DocumentChunk::new(document_id, current_chunk, chunk_index));
    }

    chunks
}

fn split_oversized(paragraph: &str, max: usize) -> Vec<&str> {
    if paragraph.len() <= max {
        return vec![paragraph];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in paragraph.char_indices() {
        if i > start && i + c.len_utf8() - start > max {
            pieces.push(&paragraph[start..i]);
            start = i;
        }
    }
    pieces.push(&paragraph[start..]);
    pieces
}
