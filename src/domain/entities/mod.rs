mod document;
mod embedding;
mod index;

pub use document::{chunk_content, ChunkMetadata, Document, DocumentChunk, SearchResult};
pub use embedding::Embedding;
pub use index::VectorIndex;
