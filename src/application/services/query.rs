use std::sync::Arc;
use tracing::instrument;

use super::RagService;
use crate::domain::{ports::LlmService, DomainError, SearchResult, VectorIndex};

/// Answers questions over an index by retrieving context and prompting the LLM.
pub struct QueryEngine {
    rag: Arc<RagService>,
    llm: Arc<dyn LlmService>,
    text_qa_template: String,
}

impl QueryEngine {
    pub fn new(rag: Arc<RagService>, llm: Arc<dyn LlmService>, text_qa_template: String) -> Self {
        Self {
            rag,
            llm,
            text_qa_template,
        }
    }

    #[instrument(skip(self, index), fields(model = self.llm.model()))]
    pub async fn query(&self, index: &VectorIndex, question: &str) -> Result<String, DomainError> {
        let results = self.rag.retrieve(index, question).await?;
        tracing::debug!(retrieved = results.len(), "context retrieved");

        let prompt = self.build_prompt(&results, question);
        self.llm.complete(&prompt).await
    }

    fn build_prompt(&self, results: &[SearchResult], question: &str) -> String {
        let context = results
            .iter()
            .map(|r| format!("file_path: {}\n\n{}", r.chunk.source().display(), r.chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        self.text_qa_template
            .replace("{context_str}", &context)
            .replace("{query_str}", question)
    }
}
