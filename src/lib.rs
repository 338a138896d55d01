//! Ask questions about a local folder of documents.
//!
//! Documents are read from a directory, embedded through a local Ollama
//! server and held in an in-memory vector index. Questions are answered by
//! retrieving the closest chunks and prompting the model with them.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use domain::DomainError;
pub use infrastructure::{AskAgent, Config, Services};
