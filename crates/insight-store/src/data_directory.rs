//! Data directory management for the insight-store crate
//!
//! All state the reasoner keeps between runs lives under a single data directory:
//!
//! ```text
//! .reasoner/
//! ├── insights/
//! │   ├── <sha256 of source path>.json
//! │   ├── ...
//! ├── logs/
//! │   ├── reasoner.log
//! ```

use crate::errors::{InsightStoreError, Result};
use std::path::{Path, PathBuf};

const REASONER_DATA_DIR_NAME: &str = ".reasoner";
const INSIGHTS_DIR_NAME: &str = "insights";
const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Clone)]
pub struct DataDirectory {
    pub root_path: PathBuf,
    pub insights_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl DataDirectory {
    pub fn new_system_default() -> Result<Self> {
        let root_path = Self::get_system_data_directory()?;
        Self::new(root_path)
    }

    pub fn new(root_path: PathBuf) -> Result<Self> {
        let data_dir = Self {
            insights_dir: root_path.join(INSIGHTS_DIR_NAME),
            logs_dir: root_path.join(LOGS_DIR_NAME),
            root_path,
        };
        data_dir.ensure_directory_structure()?;
        Ok(data_dir)
    }

    pub fn get_system_data_directory() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(REASONER_DATA_DIR_NAME))
            .ok_or(InsightStoreError::SystemDataDirectoryNotFound)
    }

    pub fn ensure_directory_structure(&self) -> Result<()> {
        for dir in [&self.root_path, &self.insights_dir, &self.logs_dir] {
            Self::ensure_dir(dir)?;
        }
        Ok(())
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|_| {
                InsightStoreError::DataDirectoryCreationFailed {
                    path: dir.to_path_buf(),
                }
            })?;
            log::debug!("Created directory: {}", dir.display());
        }
        Ok(())
    }
}
