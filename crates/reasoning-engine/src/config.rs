use crate::errors::{EngineError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Heuristic limits used by the analysis passes. A finding is reported when a
/// measurement is strictly greater than its limit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    pub complexity_warning: usize,
    pub refactoring_proposal: usize,
    pub long_function_lines: usize,
    pub max_parameters: usize,
    pub max_nesting_depth: usize,
    /// Number of trailing lines the intent pass looks at.
    pub intent_window_lines: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            complexity_warning: 10,
            refactoring_proposal: 15,
            long_function_lines: 50,
            max_parameters: 5,
            max_nesting_depth: 4,
            intent_window_lines: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long the scheduler waits on an empty queue before re-checking.
    pub idle_interval_ms: u64,
    /// Pause after each processed task.
    pub throttle_interval_ms: u64,
    /// Upper bound on reading, parsing and analyzing a single file. Unbounded when unset.
    pub analysis_timeout_ms: Option<u64>,
    /// Files larger than this are rejected by the filesystem store.
    pub max_file_size: u64,
    pub thresholds: AnalysisThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: 1000,
            throttle_interval_ms: 100,
            analysis_timeout_ms: None,
            max_file_size: 5_000_000,
            thresholds: AnalysisThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        self.analysis_timeout_ms.map(Duration::from_millis)
    }
}
