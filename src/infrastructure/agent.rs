use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::{QueryEngine, RagService};
use crate::domain::{
    ports::{DocumentSource, EmbeddingService, LlmService},
    DomainError, VectorIndex,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::embedding::OllamaEmbedding;
use crate::infrastructure::llm::OllamaLlm;
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::reader::DirectoryReader;

/// The collaborators an [`AskAgent`] delegates to.
pub struct Services {
    pub source: Arc<dyn DocumentSource>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub llm: Arc<dyn LlmService>,
}

impl Services {
    /// Directory reader plus an Ollama server for both embeddings and answers.
    pub fn ollama(config: &Config) -> Self {
        let (embedding, llm) = ollama_clients(config);
        Self {
            source: Arc::new(DirectoryReader::new().recursive(config.rag.recursive)),
            embedding: Arc::new(embedding),
            llm: Arc::new(llm),
        }
    }
}

fn ollama_clients(config: &Config) -> (OllamaEmbedding, OllamaLlm) {
    let client = OllamaClient::new(&config.llm.base_url);
    (
        OllamaEmbedding::new(client.clone(), &config.embedding.model),
        OllamaLlm::new(client, &config.llm.model),
    )
}

/// Answers questions over the knowledge base directory.
///
/// The agent owns exactly one index. It always reflects the directory as it
/// was at the last successful (re)load.
pub struct AskAgent {
    config: Config,
    source: Arc<dyn DocumentSource>,
    rag: Arc<RagService>,
    engine: QueryEngine,
    index: VectorIndex,
}

impl AskAgent {
    pub async fn connect(config: Config) -> Result<Self, DomainError> {
        let services = Services::ollama(&config);
        Self::new(config, services).await
    }

    /// Wires the services and performs the initial index build.
    pub async fn new(config: Config, services: Services) -> Result<Self, DomainError> {
        let rag = Arc::new(RagService::new(
            services.embedding,
            config.rag.chunk_size,
            config.rag.top_k,
        ));
        let engine = QueryEngine::new(rag.clone(), services.llm, config.prompts.text_qa.clone());
        let index = build_index(services.source.as_ref(), &rag, &config.docs_path()).await?;

        Ok(Self {
            config,
            source: services.source,
            rag,
            engine,
            index,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Builds a new index from the directory's current contents without
    /// touching the one in use.
    pub async fn load_index(&self) -> Result<VectorIndex, DomainError> {
        build_index(self.source.as_ref(), &self.rag, &self.config.docs_path()).await
    }

    /// Replaces the index with a fresh build and returns the previous one.
    /// On failure the current index stays in place.
    pub async fn reindex(&mut self) -> Result<VectorIndex, DomainError> {
        let fresh = self.load_index().await?;
        Ok(std::mem::replace(&mut self.index, fresh))
    }

    pub async fn query(&self, question: &str) -> Result<String, DomainError> {
        self.engine.query(&self.index, question).await
    }
}

#[instrument(skip(source, rag, dir), fields(dir = %dir.display()))]
async fn build_index(
    source: &dyn DocumentSource,
    rag: &RagService,
    dir: &Path,
) -> Result<VectorIndex, DomainError> {
    let documents = source.load(dir).await?;
    let index = rag.build_index(&documents).await?;
    info!(documents = index.document_count(), chunks = index.len(), "index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Document, Embedding};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory document source whose contents tests can swap between loads.
    #[derive(Default)]
    struct FakeSource {
        files: Mutex<Vec<(String, String)>>,
        loads: Mutex<Vec<PathBuf>>,
    }

    impl FakeSource {
        fn set(&self, files: &[(&str, &str)]) {
            *self.files.lock().unwrap() = files
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect();
        }
    }

    #[async_trait]
    impl DocumentSource for FakeSource {
        async fn load(&self, dir: &Path) -> Result<Vec<Document>, DomainError> {
            self.loads.lock().unwrap().push(dir.to_path_buf());
            let files = self.files.lock().unwrap();
            if files.is_empty() {
                return Err(DomainError::not_found("No files found"));
            }
            Ok(files
                .iter()
                .map(|(name, content)| Document::new(dir.join(name), content.as_str()))
                .collect())
        }
    }

    struct LengthEmbedding;

    #[async_trait]
    impl EmbeddingService for LengthEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![text.len() as f32, 1.0]))
        }

        fn model(&self) -> &str {
            "length"
        }
    }

    struct EchoLlm;

    #[async_trait]
    impl LlmService for EchoLlm {
        async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
            Ok(format!("echo: {}", prompt.len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn config() -> Config {
        Config {
            docs_dir: "/kb".to_string(),
            ..Config::default()
        }
    }

    async fn agent_with(source: Arc<FakeSource>) -> Result<AskAgent, DomainError> {
        AskAgent::new(
            config(),
            Services {
                source,
                embedding: Arc::new(LengthEmbedding),
                llm: Arc::new(EchoLlm),
            },
        )
        .await
    }

    #[test]
    fn test_ollama_services_follow_config() {
        let config = Config::from_lookup(|key| match key {
            "ASK_OLLAMA_MODEL" => Some("llama3".to_string()),
            "ASK_OLLAMA_BASE_URL" => Some("http://gpu-box:8080".to_string()),
            "ASK_EMBED_MODEL" => Some("nomic-embed-text".to_string()),
            _ => None,
        });

        let (embedding, llm) = ollama_clients(&config);
        assert_eq!(llm.base_url(), "http://gpu-box:8080");
        assert_eq!(LlmService::model(&llm), "llama3");
        assert_eq!(embedding.base_url(), "http://gpu-box:8080");
        assert_eq!(EmbeddingService::model(&embedding), "nomic-embed-text");

        let services = Services::ollama(&config);
        assert_eq!(services.llm.model(), "llama3");
        assert_eq!(services.embedding.model(), "nomic-embed-text");
    }

    #[test]
    fn test_ollama_services_default_to_local_server() {
        let (embedding, llm) = ollama_clients(&Config::default());
        assert_eq!(llm.base_url(), "http://localhost:11434");
        assert_eq!(LlmService::model(&llm), "deepseek-local");
        assert_eq!(EmbeddingService::model(&embedding), "deepseek-local");
    }

    #[tokio::test]
    async fn test_construction_builds_index_once() {
        let source = Arc::new(FakeSource::default());
        source.set(&[("a.md", "alpha")]);

        let agent = agent_with(source.clone()).await.unwrap();

        assert_eq!(*source.loads.lock().unwrap(), vec![PathBuf::from("/kb")]);
        assert_eq!(agent.index().document_count(), 1);
    }

    #[tokio::test]
    async fn test_reindex_replaces_contents() {
        let source = Arc::new(FakeSource::default());
        source.set(&[("a.md", "alpha"), ("b.md", "bravo")]);
        let mut agent = agent_with(source.clone()).await.unwrap();

        source.set(&[("b.md", "bravo"), ("c.md", "charlie")]);
        let previous = agent.reindex().await.unwrap();

        assert_eq!(previous.document_count(), 2);
        let sources: Vec<_> = agent.index().sources().into_iter().collect();
        assert_eq!(sources, vec![Path::new("/kb/b.md"), Path::new("/kb/c.md")]);
    }

    #[tokio::test]
    async fn test_failed_reindex_keeps_current_index() {
        let source = Arc::new(FakeSource::default());
        source.set(&[("a.md", "alpha")]);
        let mut agent = agent_with(source.clone()).await.unwrap();

        source.set(&[]);
        assert!(agent.reindex().await.is_err());
        assert_eq!(agent.index().document_count(), 1);
    }

    #[tokio::test]
    async fn test_construction_fails_without_documents() {
        let source = Arc::new(FakeSource::default());
        let err = agent_with(source).await.err().unwrap();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_query_goes_through_llm() {
        let source = Arc::new(FakeSource::default());
        source.set(&[("a.md", "alpha")]);
        let agent = agent_with(source).await.unwrap();

        let answer = agent.query("anything").await.unwrap();
        assert!(answer.starts_with("echo: "));
    }
}
