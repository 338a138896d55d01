//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! implementations, so the agent can run against Ollama or test doubles.

pub mod services;

pub use services::{QueryEngine, RagService};
