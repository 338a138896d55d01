mod document_source;
mod embedding;
mod llm;

pub use document_source::DocumentSource;
pub use embedding::EmbeddingService;
pub use llm::LlmService;
