use crate::errors::Result;
use crate::insight::Insight;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Durable storage for insight sets, keyed by source file path.
///
/// Every `save` replaces whatever was stored for the path before.
#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn save(&self, file_path: &str, insights: &[Insight]) -> Result<()>;

    /// Returns `None` when nothing was ever saved for the path.
    async fn load(&self, file_path: &str) -> Result<Option<Vec<Insight>>>;

    /// Removes every stored set, returning how many were removed.
    async fn clear(&self) -> Result<usize>;
}

/// Process-local store, used for ephemeral runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryInsightStore {
    entries: RwLock<HashMap<String, Vec<Insight>>>,
}

impl InMemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl InsightStore for InMemoryInsightStore {
    async fn save(&self, file_path: &str, insights: &[Insight]) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(file_path.to_string(), insights.to_vec());
        Ok(())
    }

    async fn load(&self, file_path: &str) -> Result<Option<Vec<Insight>>> {
        Ok(self.entries.read().await.get(file_path).cloned())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::{InsightCategory, Severity};

    #[tokio::test]
    async fn test_in_memory_save_replaces_previous_set() {
        let store = InMemoryInsightStore::new();
        let first = vec![
            Insight::new("a.ts", 1, 0, Severity::Info, InsightCategory::Smell, "one"),
            Insight::new("a.ts", 2, 0, Severity::Info, InsightCategory::Smell, "two"),
        ];
        let second = vec![Insight::new(
            "a.ts",
            9,
            0,
            Severity::Warning,
            InsightCategory::Complexity,
            "three",
        )];

        store.save("a.ts", &first).await.unwrap();
        store.save("a.ts", &second).await.unwrap();

        assert_eq!(store.load("a.ts").await.unwrap(), Some(second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_in_memory_distinguishes_empty_from_missing() {
        let store = InMemoryInsightStore::new();
        store.save("empty.ts", &[]).await.unwrap();

        assert_eq!(store.load("empty.ts").await.unwrap(), Some(Vec::new()));
        assert_eq!(store.load("missing.ts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_clear() {
        let store = InMemoryInsightStore::new();
        store.save("a.ts", &[]).await.unwrap();
        store.save("b.ts", &[]).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.is_empty().await);
    }
}
