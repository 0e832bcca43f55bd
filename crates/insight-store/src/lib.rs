//! # Insight Store
//!
//! Data model and persistence for the findings produced by the background
//! reasoning engine.
//!
//! This crate provides:
//! - The [`Insight`] record shared by the engine, the event bus and the stores
//! - The [`InsightStore`] contract the engine persists through
//! - A JSON-file store rooted in the reasoner data directory and an in-memory store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use insight_store::{DataDirectory, InsightStore, JsonInsightStore};
//!
//! # async fn run() -> insight_store::Result<()> {
//! let data_dir = DataDirectory::new_system_default()?;
//! let store = JsonInsightStore::new(data_dir);
//! let insights = store.load("src/app.ts").await?.unwrap_or_default();
//! # Ok(())
//! # }
//! ```

pub mod data_directory;
pub mod errors;
pub mod insight;
pub mod json_store;
pub mod store;

pub use data_directory::DataDirectory;
pub use errors::{InsightStoreError, Result};
pub use insight::{Insight, InsightCategory, Severity};
pub use json_store::JsonInsightStore;
pub use store::{InMemoryInsightStore, InsightStore};
