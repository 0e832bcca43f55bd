use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority tiers for analysis tasks.
///
/// High-priority tasks jump to the front of the queue; medium and low share
/// FIFO order behind them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        })
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority '{other}', expected high, medium or low")),
        }
    }
}

/// Informational only; both kinds are processed identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Full,
    Incremental,
}

/// One queued request to analyze a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTask {
    pub id: String,
    pub file_path: String,
    pub priority: TaskPriority,
    pub kind: TaskKind,
    pub enqueued_at: DateTime<Utc>,
}

impl AnalysisTask {
    pub fn new(
        file_path: impl Into<String>,
        priority: TaskPriority,
        kind: TaskKind,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        let file_path = file_path.into();
        Self {
            id: format!("{}-{}", file_path, enqueued_at.timestamp_micros()),
            file_path,
            priority,
            kind,
            enqueued_at,
        }
    }
}
