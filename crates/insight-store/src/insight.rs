use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// How urgently an insight should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/insights.ts")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// The analysis pass family an insight originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/insights.ts")]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum InsightCategory {
    Complexity,
    Smell,
    Intent,
}

/// A single analysis finding attached to a source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/insights.ts")]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub file_path: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub category: InsightCategory,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Insight {
    /// Creates an insight with a fresh id, stamped with the current time.
    pub fn new(
        file_path: impl Into<String>,
        line: usize,
        column: usize,
        severity: Severity,
        category: InsightCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_path: file_path.into(),
            line,
            column,
            severity,
            category,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
