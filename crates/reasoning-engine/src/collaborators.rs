//! Contracts for the services the engine depends on but does not own, and
//! their default implementations.
//!
//! The symbol parser and the durable insight store contracts live in the
//! `symbol-parser` and `insight-store` crates and are re-exported here.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use insight_store::InsightStore;
pub use symbol_parser::{Symbol, SymbolParser};

/// Source of file contents.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn read_file(&self, file_path: &str) -> io::Result<String>;
}

/// Receives proposals to refactor overly complex symbols. Fire-and-forget:
/// implementations must not block the caller.
pub trait RefactoringAdvisor: Send + Sync {
    fn propose_refactoring(&self, file_path: &str, symbol: &Symbol, complexity: usize);
}

/// Reads files from the local filesystem, optionally relative to a root.
#[derive(Debug, Clone)]
pub struct FsFileStore {
    root: Option<PathBuf>,
    max_file_size: u64,
}

impl FsFileStore {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            root: None,
            max_file_size,
        }
    }

    pub fn with_root(root: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            root: Some(root.into()),
            max_file_size,
        }
    }

    fn resolve(&self, file_path: &str) -> PathBuf {
        match &self.root {
            Some(root) if Path::new(file_path).is_relative() => root.join(file_path),
            _ => PathBuf::from(file_path),
        }
    }
}

#[async_trait]
impl FileStore for FsFileStore {
    async fn read_file(&self, file_path: &str) -> io::Result<String> {
        let path = self.resolve(file_path);
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        if metadata.len() > self.max_file_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} is {} bytes, over the {} byte limit",
                    path.display(),
                    metadata.len(),
                    self.max_file_size
                ),
            ));
        }

        debug!("Reading {} ({} bytes)", path.display(), metadata.len());
        tokio::fs::read_to_string(&path).await
    }
}

/// Advisor that only records proposals in the log.
#[derive(Debug, Default, Clone)]
pub struct TracingRefactoringAdvisor;

impl RefactoringAdvisor for TracingRefactoringAdvisor {
    fn propose_refactoring(&self, file_path: &str, symbol: &Symbol, complexity: usize) {
        info!(
            "Refactoring proposed for {} '{}' in {}:{} (complexity {})",
            symbol.kind, symbol.name, file_path, symbol.line, complexity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_store_reads_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.ts"), "export {};").unwrap();
        let store = FsFileStore::with_root(temp_dir.path(), 1024);

        assert_eq!(store.read_file("a.ts").await.unwrap(), "export {};");
    }

    #[tokio::test]
    async fn test_fs_store_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsFileStore::with_root(temp_dir.path(), 1024);

        let err = store.read_file("missing.ts").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_fs_store_enforces_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.ts");
        std::fs::write(&path, "x".repeat(64)).unwrap();
        let store = FsFileStore::new(16);

        let err = store
            .read_file(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_fs_store_rejects_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsFileStore::new(1024);

        let err = store
            .read_file(temp_dir.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
