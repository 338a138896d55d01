pub mod agent;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod reader;

pub use agent::{AskAgent, Services};
pub use config::{Config, EmbeddingConfig, LlmConfig, PromptsConfig, RagConfig};
pub use embedding::OllamaEmbedding;
pub use llm::OllamaLlm;
pub use ollama::OllamaClient;
pub use reader::DirectoryReader;
