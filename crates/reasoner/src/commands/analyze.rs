use anyhow::Result;
use event_bus::ReasoningEvent;
use insight_store::{InMemoryInsightStore, InsightStore, JsonInsightStore};
use reasoning_engine::{
    EngineConfig, FsFileStore, ReasoningEngine, SchedulerState, TracingRefactoringAdvisor,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use symbol_parser::RegexSymbolParser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::commands::data_directory;
use crate::files::collect_source_files;

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Files still waiting for a terminal event, plus outcome counts.
struct Progress {
    pending: HashSet<String>,
    analyzed: usize,
    failed: usize,
}

impl Progress {
    fn new(files: &[String]) -> Self {
        Self {
            pending: files.iter().cloned().collect(),
            analyzed: 0,
            failed: 0,
        }
    }

    fn record(&mut self, event: &ReasoningEvent) -> Result<()> {
        println!("{}", serde_json::to_string(event)?);
        match event {
            ReasoningEvent::AnalysisComplete(complete) => {
                if self.pending.remove(&complete.file_path) {
                    self.analyzed += 1;
                }
            }
            ReasoningEvent::AnalysisError(error) => {
                if self.pending.remove(&error.file_path) {
                    self.failed += 1;
                }
            }
            ReasoningEvent::IntentDetected(_) => {}
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.pending.is_empty()
    }
}

pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };

    let files = collect_source_files(&args.paths)?;
    if files.is_empty() {
        warn!("No supported source files found");
        return Ok(());
    }

    let store: Arc<dyn InsightStore> = if args.no_persist {
        Arc::new(InMemoryInsightStore::new())
    } else {
        Arc::new(JsonInsightStore::new(data_directory(&args.data)?))
    };
    let engine = ReasoningEngine::builder(
        Arc::new(FsFileStore::new(config.max_file_size)),
        Arc::new(RegexSymbolParser::new()),
        store,
    )
    .with_config(config)
    .with_advisor(Arc::new(TracingRefactoringAdvisor))
    .build();

    let mut events = engine.subscribe();
    for file in &files {
        engine.queue_analysis(file, args.priority);
    }
    info!("Queued {} files with {} priority", files.len(), args.priority);
    engine.start()?;

    let mut progress = Progress::new(&files);
    let mut ticker = tokio::time::interval(STATUS_POLL_INTERVAL);
    while !progress.is_done() {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => progress.record(&event)?,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, {} events not printed", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            // Covers events lost to lag: once the loop is idle with nothing
            // queued, every event it will publish is already in the channel.
            _ = ticker.tick() => {
                let status = engine.get_queue_status();
                if status.queue_length == 0 && status.state == SchedulerState::Idle {
                    while let Ok(event) = events.try_recv() {
                        progress.record(&event)?;
                    }
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, {} files left unanalyzed", progress.pending.len());
                break;
            }
        }
    }

    engine.shutdown().await;
    info!(
        "Analysis finished: {} analyzed, {} failed",
        progress.analyzed, progress.failed
    );
    Ok(())
}
