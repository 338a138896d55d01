use std::env;
use std::path::PathBuf;

pub const DOCS_DIR_VAR: &str = "ASK_KB_DIR";
pub const MODEL_VAR: &str = "ASK_OLLAMA_MODEL";
pub const BASE_URL_VAR: &str = "ASK_OLLAMA_BASE_URL";
pub const EMBED_MODEL_VAR: &str = "ASK_EMBED_MODEL";
pub const CHUNK_SIZE_VAR: &str = "ASK_CHUNK_SIZE";
pub const TOP_K_VAR: &str = "ASK_TOP_K";
pub const RECURSIVE_VAR: &str = "ASK_KB_RECURSIVE";

pub const DEFAULT_DOCS_DIR: &str = "~/Documents/knowledge_base";
pub const DEFAULT_MODEL: &str = "deepseek-local";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_TOP_K: usize = 2;

/// Runtime configuration, resolved once at startup and handed to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub docs_dir: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub top_k: usize,
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptsConfig {
    /// Question-answering template with `{context_str}` and `{query_str}` slots.
    pub text_qa: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            text_qa: "Context information is below.\n\
                      ---------------------\n\
                      {context_str}\n\
                      ---------------------\n\
                      Given the context information and not prior knowledge, answer the query.\n\
                      Query: {query_str}\n\
                      Answer: "
                .to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves every value through `lookup`, falling back to the defaults for
    /// unset keys. The directory, model and URL are taken verbatim.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            docs_dir: lookup(DOCS_DIR_VAR).unwrap_or_else(|| DEFAULT_DOCS_DIR.to_string()),
            embedding: EmbeddingConfig {
                model: lookup(EMBED_MODEL_VAR).unwrap_or_else(|| model.clone()),
            },
            llm: LlmConfig {
                model,
                base_url: lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            rag: RagConfig {
                chunk_size: lookup(CHUNK_SIZE_VAR)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_CHUNK_SIZE),
                top_k: lookup(TOP_K_VAR)
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_TOP_K),
                recursive: lookup(RECURSIVE_VAR)
                    .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            },
            prompts: PromptsConfig::default(),
        }
    }

    /// The documents directory with a leading `~` resolved against `HOME`.
    pub fn docs_path(&self) -> PathBuf {
        expand_home(&self.docs_dir, env::var("HOME").ok().as_deref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Replaces a leading `~` (alone or followed by `/`) with `home`. Other paths,
/// and any path when `home` is unknown, are returned unchanged.
pub fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => PathBuf::from(home),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            PathBuf::from(home).join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}
