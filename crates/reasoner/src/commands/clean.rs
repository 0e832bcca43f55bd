use anyhow::Result;
use insight_store::{InsightStore, JsonInsightStore};
use tracing::info;

use crate::cli::DataArgs;
use crate::commands::data_directory;

pub async fn run(data: &DataArgs) -> Result<()> {
    let store = JsonInsightStore::new(data_directory(data)?);
    let removed = store.clear().await?;
    info!("Clean completed, removed {} insight records", removed);
    Ok(())
}
