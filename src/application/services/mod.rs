mod query;
mod rag;

pub use query::QueryEngine;
pub use rag::RagService;
