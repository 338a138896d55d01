use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

use crate::domain::{ports::DocumentSource, Document, DomainError};

/// Reads every text file in a directory into a [`Document`].
///
/// Symlinks are followed. Hidden entries are skipped, as are entries that
/// cannot be read and files that are not valid UTF-8. Subdirectories are only
/// visited when `recursive` is set.
#[derive(Debug, Clone, Default)]
pub struct DirectoryReader {
    recursive: bool,
}

impl DirectoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    async fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>, DomainError> {
        let mut files = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            // Symlinked directories can point back up the tree.
            if let Ok(real) = fs::canonicalize(&dir).await {
                if !visited.insert(real) {
                    continue;
                }
            }

            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| DomainError::io(&dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| DomainError::io(&dir, e))?
            {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                let metadata = match fs::metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                        continue;
                    }
                };

                if metadata.is_dir() {
                    if self.recursive {
                        pending.push(path);
                    }
                } else if metadata.is_file() {
                    files.push(path);
                } else {
                    warn!(path = %path.display(), "skipping entry that is not a regular file");
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl DocumentSource for DirectoryReader {
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    async fn load(&self, dir: &Path) -> Result<Vec<Document>, DomainError> {
        if !fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(DomainError::not_found(format!(
                "Directory {} does not exist.",
                dir.display()
            )));
        }

        let mut documents = Vec::new();
        for path in self.collect_files(dir).await? {
            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            match String::from_utf8(bytes) {
                Ok(content) => documents.push(Document::new(path, content)),
                Err(_) => warn!(path = %path.display(), "skipping non UTF-8 file"),
            }
        }

        if documents.is_empty() {
            return Err(DomainError::not_found(format!(
                "No files found in {}.",
                dir.display()
            )));
        }

        debug!(count = documents.len(), recursive = self.recursive, "documents loaded");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_loads_visible_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("b.txt"), "bravo").unwrap();
        stdfs::write(dir.path().join("a.md"), "alpha").unwrap();
        stdfs::write(dir.path().join(".hidden"), "secret").unwrap();

        let docs = DirectoryReader::new().load(dir.path()).await.unwrap();

        assert_eq!(names(&docs), vec!["a.md", "b.txt"]);
        assert_eq!(docs[0].content, "alpha");
    }

    #[tokio::test]
    async fn test_subdirectories_only_when_recursive() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("top.txt"), "top").unwrap();
        stdfs::create_dir(dir.path().join("nested")).unwrap();
        stdfs::write(dir.path().join("nested").join("deep.txt"), "deep").unwrap();

        let flat = DirectoryReader::new().load(dir.path()).await.unwrap();
        assert_eq!(names(&flat), vec!["top.txt"]);

        let deep = DirectoryReader::new()
            .recursive(true)
            .load(dir.path())
            .await
            .unwrap();
        assert_eq!(names(&deep), vec!["deep.txt", "top.txt"]);
    }

    #[tokio::test]
    async fn test_skips_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        stdfs::write(dir.path().join("notes.txt"), "notes").unwrap();

        let docs = DirectoryReader::new().load(dir.path()).await.unwrap();
        assert_eq!(names(&docs), vec!["notes.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directory_is_not_read_as_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        stdfs::write(other.path().join("linked.txt"), "linked").unwrap();
        stdfs::write(dir.path().join("notes.txt"), "notes").unwrap();
        std::os::unix::fs::symlink(other.path(), dir.path().join("linked")).unwrap();

        let flat = DirectoryReader::new().load(dir.path()).await.unwrap();
        assert_eq!(names(&flat), vec!["notes.txt"]);

        let deep = DirectoryReader::new()
            .recursive(true)
            .load(dir.path())
            .await
            .unwrap();
        assert_eq!(names(&deep), vec!["linked.txt", "notes.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("notes.txt"), "notes").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let docs = DirectoryReader::new().load(dir.path()).await.unwrap();
        assert_eq!(names(&docs), vec!["notes.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        stdfs::write(other.path().join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(other.path().join("real.txt"), dir.path().join("alias.txt"))
            .unwrap();

        let docs = DirectoryReader::new().load(dir.path()).await.unwrap();
        assert_eq!(names(&docs), vec!["alias.txt"]);
        assert_eq!(docs[0].content, "real");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_recursive_symlink_loop_terminates() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("notes.txt"), "notes").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let docs = DirectoryReader::new()
            .recursive(true)
            .load(dir.path())
            .await
            .unwrap();
        assert_eq!(names(&docs), vec!["notes.txt"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = DirectoryReader::new().load(&missing).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join(".only-hidden"), "x").unwrap();

        let err = DirectoryReader::new().load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }
}
