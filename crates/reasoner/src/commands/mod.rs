pub mod analyze;
pub mod clean;
pub mod insights;

use crate::cli::DataArgs;
use anyhow::Result;
use insight_store::DataDirectory;

pub fn data_directory(data: &DataArgs) -> Result<DataDirectory> {
    let data_directory = match &data.data_dir {
        Some(dir) => DataDirectory::new(dir.clone())?,
        None => DataDirectory::new_system_default()?,
    };
    Ok(data_directory)
}
