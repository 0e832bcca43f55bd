//! # Reasoning Engine
//!
//! Continuously analyzes source files in the background while a developer
//! edits them.
//!
//! ```text
//! queue_analysis ──▶ TaskQueue ──▶ Scheduler ──▶ FileStore::read_file
//!                                      │          SymbolParser::parse
//!                                      │          AnalyzerPipeline::run
//!                                      ▼
//!                    InsightCache ◀── results ──▶ EventBus
//!                                      │
//!                                      ▼
//!                                 InsightStore::save
//! ```
//!
//! A single worker drains the queue, so at most one file is analyzed at a
//! time. A failure while reading, parsing or analyzing a file empties that
//! file's cached insights and publishes an `analysis-error` event; the
//! worker then moves on to the next task.

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod errors;
pub mod pipeline;
pub mod queue;
mod scheduler;
pub mod task;

pub use cache::InsightCache;
pub use collaborators::{
    FileStore, FsFileStore, InsightStore, RefactoringAdvisor, SymbolParser,
    TracingRefactoringAdvisor,
};
pub use config::{AnalysisThresholds, EngineConfig};
pub use engine::{QueueStatus, ReasoningEngine, ReasoningEngineBuilder};
pub use errors::{EngineError, Result};
pub use pipeline::{AnalyzerPipeline, IntentSignal, PipelineOutput, RefactoringCandidate};
pub use queue::TaskQueue;
pub use scheduler::SchedulerState;
pub use task::{AnalysisTask, TaskKind, TaskPriority};
