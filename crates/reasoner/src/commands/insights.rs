use anyhow::Result;
use insight_store::{InsightStore, JsonInsightStore};
use std::path::Path;
use tracing::info;

use crate::cli::DataArgs;
use crate::commands::data_directory;

/// Prints the persisted insights for `path` as a JSON array; empty when
/// nothing was stored.
pub async fn run(path: &Path, data: &DataArgs) -> Result<()> {
    // `analyze` stores records under canonical paths.
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let file_path = path.to_string_lossy();
    let store = JsonInsightStore::new(data_directory(data)?);

    let insights = match store.load(&file_path).await? {
        Some(insights) => insights,
        None => {
            info!("No insights stored for {}", file_path);
            Vec::new()
        }
    };

    println!("{}", serde_json::to_string_pretty(&insights)?);
    Ok(())
}
