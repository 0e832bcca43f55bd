use crate::data_directory::DataDirectory;
use crate::errors::Result;
use crate::insight::Insight;
use crate::store::InsightStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;

/// On-disk record for one source file's insight set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsightRecord {
    file_path: String,
    saved_at: DateTime<Utc>,
    insights: Vec<Insight>,
}

/// Stores each source file's insights as a pretty-printed JSON file under
/// `<data_dir>/insights/`, named by the SHA-256 of the source path.
#[derive(Debug, Clone)]
pub struct JsonInsightStore {
    data_directory: DataDirectory,
}

impl JsonInsightStore {
    pub fn new(data_directory: DataDirectory) -> Self {
        Self { data_directory }
    }

    pub fn data_directory(&self) -> &DataDirectory {
        &self.data_directory
    }

    pub fn record_path(&self, file_path: &str) -> PathBuf {
        self.data_directory
            .insights_dir
            .join(format!("{}.json", hash_file_path(file_path)))
    }
}

/// Stable file name for a source path.
pub fn hash_file_path(file_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl InsightStore for JsonInsightStore {
    async fn save(&self, file_path: &str, insights: &[Insight]) -> Result<()> {
        let record_path = self.record_path(file_path);
        debug!(
            "Saving {} insights for {} to {}",
            insights.len(),
            file_path,
            record_path.display()
        );

        let record = InsightRecord {
            file_path: file_path.to_string(),
            saved_at: Utc::now(),
            insights: insights.to_vec(),
        };
        let content = serde_json::to_string_pretty(&record)?;

        fs::create_dir_all(&self.data_directory.insights_dir).await?;
        let temp_path = record_path.with_extension("tmp");
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &record_path).await?;

        Ok(())
    }

    async fn load(&self, file_path: &str) -> Result<Option<Vec<Insight>>> {
        let record_path = self.record_path(file_path);
        let content = match fs::read_to_string(&record_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: InsightRecord = serde_json::from_str(&content)?;
        if record.file_path != file_path {
            warn!(
                "Insight record {} belongs to {}, not {}",
                record_path.display(),
                record.file_path,
                file_path
            );
            return Ok(None);
        }

        debug!(
            "Loaded {} insights for {} saved at {}",
            record.insights.len(),
            file_path,
            record.saved_at
        );
        Ok(Some(record.insights))
    }

    async fn clear(&self) -> Result<usize> {
        let insights_dir = &self.data_directory.insights_dir;
        if !insights_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(insights_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!(
            "Removed {} insight records from {}",
            removed,
            insights_dir.display()
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::{InsightCategory, Severity};
    use tempfile::TempDir;

    fn create_store() -> (JsonInsightStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDirectory::new(temp_dir.path().to_path_buf()).unwrap();
        (JsonInsightStore::new(data_dir), temp_dir)
    }

    #[tokio::test]
    async fn test_save_then_load_returns_equal_insights() {
        let (store, _temp_dir) = create_store();
        let insights = vec![
            Insight::new(
                "src/app.ts",
                3,
                2,
                Severity::Warning,
                InsightCategory::Complexity,
                "Function 'render' has high cyclomatic complexity (12)",
            ),
            Insight::new(
                "src/app.ts",
                40,
                0,
                Severity::Info,
                InsightCategory::Smell,
                "Function 'load' has 7 parameters",
            ),
        ];

        store.save("src/app.ts", &insights).await.unwrap();
        let loaded = store.load("src/app.ts").await.unwrap();

        assert_eq!(loaded, Some(insights));
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let (store, _temp_dir) = create_store();

        assert_eq!(store.load("never/saved.ts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_set_round_trips_as_empty() {
        let (store, _temp_dir) = create_store();

        store.save("clean.ts", &[]).await.unwrap();

        assert_eq!(store.load("clean.ts").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let (store, _temp_dir) = create_store();

        store.save("a.ts", &[]).await.unwrap();

        let record_path = store.record_path("a.ts");
        assert!(record_path.exists());
        assert!(!record_path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_all_records() {
        let (store, _temp_dir) = create_store();
        store.save("a.ts", &[]).await.unwrap();
        store.save("b.ts", &[]).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.load("a.ts").await.unwrap(), None);
        assert_eq!(store.load("b.ts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error() {
        let (store, _temp_dir) = create_store();
        std::fs::write(store.record_path("bad.ts"), "not json").unwrap();

        assert!(store.load("bad.ts").await.is_err());
    }

    #[test]
    fn test_hash_is_stable_and_distinct() {
        assert_eq!(hash_file_path("a.ts"), hash_file_path("a.ts"));
        assert_ne!(hash_file_path("a.ts"), hash_file_path("b.ts"));
        assert_eq!(hash_file_path("a.ts").len(), 64);
    }
}
