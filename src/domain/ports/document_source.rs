use async_trait::async_trait;
use std::path::Path;

use crate::domain::{errors::DomainError, Document};

/// Reads every document found under a directory.
///
/// Each call must reflect the directory as it is now; implementations do not
/// cache between calls.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self, dir: &Path) -> Result<Vec<Document>, DomainError>;
}
