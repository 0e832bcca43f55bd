//! The single worker loop that drains the task queue.

use crate::cache::InsightCache;
use crate::collaborators::{FileStore, InsightStore, RefactoringAdvisor, SymbolParser};
use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::pipeline::{AnalyzerPipeline, PipelineOutput};
use crate::queue::TaskQueue;
use crate::task::AnalysisTask;
use chrono::Utc;
use event_bus::{AnalysisComplete, AnalysisError, EventBus, IntentDetected};
use insight_store::Insight;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    #[default]
    Idle,
    Processing,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Processing => "processing",
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoopStatus {
    pub state: SchedulerState,
    pub current_file: Option<String>,
}

/// State owned by the engine and shared with its worker.
pub(crate) struct Shared {
    pub config: EngineConfig,
    pub queue: Mutex<TaskQueue>,
    pub cache: InsightCache,
    pub status: Mutex<LoopStatus>,
    pub event_bus: Arc<EventBus>,
    pub file_store: Arc<dyn FileStore>,
    pub parser: Arc<dyn SymbolParser>,
    pub store: Arc<dyn InsightStore>,
    pub advisor: Option<Arc<dyn RefactoringAdvisor>>,
    pub pipeline: Arc<AnalyzerPipeline>,
    /// Wakes an idle worker when a task is queued.
    pub wake: Notify,
    /// Held by the running worker; a restarted worker waits here until the
    /// previous one has finished its in-flight task.
    pub worker_slot: tokio::sync::Mutex<()>,
    /// Bumped by `clear_cache` so results computed before the clear are dropped.
    pub epoch: AtomicU64,
}

impl Shared {
    pub fn queue(&self) -> MutexGuard<'_, TaskQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> MutexGuard<'_, LoopStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Caches `insights` for `file_path` unless the cache was cleared after
    /// `epoch` was taken. Checked and written under the queue lock, which
    /// `clear_cache` also holds.
    pub fn cache_if_current(&self, epoch: u64, file_path: &str, insights: Vec<Insight>) -> bool {
        let _queue = self.queue();
        if self.epoch() != epoch {
            return false;
        }
        self.cache.set(file_path, insights);
        true
    }

    fn set_status(&self, state: SchedulerState, current_file: Option<String>) {
        let mut status = self.status();
        status.state = state;
        status.current_file = current_file;
    }
}

pub(crate) struct Scheduler {
    shared: Arc<Shared>,
    cancellation_token: CancellationToken,
}

impl Scheduler {
    pub fn new(shared: Arc<Shared>, cancellation_token: CancellationToken) -> Self {
        Self {
            shared,
            cancellation_token,
        }
    }

    /// Processes tasks one at a time until the cancellation token fires.
    ///
    /// An empty queue parks the loop for at most the idle interval; a new task
    /// or a stop request ends the wait early. After each task the loop sleeps
    /// the throttle interval. The task in flight when the token fires is
    /// always finished.
    pub async fn run(self) {
        let _slot = self.shared.worker_slot.lock().await;
        let idle = self.shared.config.idle_interval();
        let throttle = self.shared.config.throttle_interval();
        info!(
            "Scheduler started (idle {:?}, throttle {:?})",
            idle, throttle
        );

        while !self.cancellation_token.is_cancelled() {
            let next = {
                let mut queue = self.shared.queue();
                // Marked while the queue is locked so status readers never see
                // an empty queue and an idle loop with a task in hand, and so
                // a concurrent clear either drops the task or outdates it.
                queue.dequeue().map(|task| {
                    self.shared
                        .set_status(SchedulerState::Processing, Some(task.file_path.clone()));
                    (task, self.shared.epoch())
                })
            };
            let Some((task, epoch)) = next else {
                tokio::select! {
                    _ = self.shared.wake.notified() => {}
                    _ = sleep(idle) => {}
                    _ = self.cancellation_token.cancelled() => break,
                }
                continue;
            };

            self.handle(task, epoch).await;

            tokio::select! {
                _ = sleep(throttle) => {}
                _ = self.cancellation_token.cancelled() => break,
            }
        }

        self.shared.set_status(SchedulerState::Idle, None);
        info!("Scheduler stopped");
    }

    async fn handle(&self, task: AnalysisTask, epoch: u64) {
        debug!(
            "Processing task {} ({:?}, {} priority)",
            task.id, task.kind, task.priority
        );

        match self.process(&task).await {
            Ok(output) => self.complete(&task, output, epoch).await,
            Err(e) => self.fail(&task, e, epoch),
        }

        self.shared.set_status(SchedulerState::Idle, None);
    }

    async fn process(&self, task: &AnalysisTask) -> Result<PipelineOutput> {
        let analysis = self.analyze(&task.file_path);
        match self.shared.config.analysis_timeout() {
            Some(after) => timeout(after, analysis)
                .await
                .map_err(|_| EngineError::Timeout {
                    path: task.file_path.clone(),
                    after,
                })?,
            None => analysis.await,
        }
    }

    /// Read, parse and run every pass. Parsing and the passes run on the
    /// blocking pool; a panic there surfaces as [`EngineError::Aborted`].
    async fn analyze(&self, file_path: &str) -> Result<PipelineOutput> {
        let content = self
            .shared
            .file_store
            .read_file(file_path)
            .await
            .map_err(|source| EngineError::FileRead {
                path: file_path.to_string(),
                source,
            })?;

        let parser = Arc::clone(&self.shared.parser);
        let pipeline = Arc::clone(&self.shared.pipeline);
        let path = file_path.to_string();
        let result = tokio::task::spawn_blocking(move || -> Result<PipelineOutput> {
            let parsed = parser
                .parse(&path, &content)
                .map_err(|source| EngineError::Parse {
                    path: path.clone(),
                    source,
                })?;
            Ok(pipeline.run(&path, &content, &parsed))
        })
        .await;

        match result {
            Ok(output) => output,
            Err(e) => Err(EngineError::Aborted {
                path: file_path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn complete(&self, task: &AnalysisTask, output: PipelineOutput, epoch: u64) {
        let PipelineOutput {
            insights,
            refactoring_candidates,
            intents,
        } = output;
        let file_path = &task.file_path;

        for signal in intents {
            debug!(
                "Intent {} detected in {} ({:.2})",
                signal.intent, file_path, signal.confidence
            );
            self.shared.event_bus.emit(IntentDetected {
                file_path: file_path.clone(),
                intent: signal.intent,
                confidence: signal.confidence,
                detected_at: Utc::now(),
            });
        }

        let current = self
            .shared
            .cache_if_current(epoch, file_path, insights.clone());
        if !current {
            debug!("Cache cleared while analyzing {}, result not cached", file_path);
        }

        if let Some(advisor) = &self.shared.advisor {
            for candidate in &refactoring_candidates {
                advisor.propose_refactoring(file_path, &candidate.symbol, candidate.complexity);
            }
        }

        info!("Analyzed {}: {} insights", file_path, insights.len());
        self.shared.event_bus.emit(AnalysisComplete {
            file_path: file_path.clone(),
            insights: insights.clone(),
            completed_at: Utc::now(),
        });

        if !current {
            return;
        }
        if let Err(e) = self
            .shared
            .store
            .save(file_path, &insights)
            .await
            .map_err(EngineError::from)
        {
            warn!("Failed to persist insights for {}: {}", file_path, e);
        }
    }

    fn fail(&self, task: &AnalysisTask, e: EngineError, epoch: u64) {
        error!("Analysis failed for {}: {}", task.file_path, e);

        self.shared
            .cache_if_current(epoch, &task.file_path, Vec::new());
        self.shared.event_bus.emit(AnalysisError {
            file_path: task.file_path.clone(),
            error: e.to_string(),
            failed_at: Utc::now(),
        });
    }
}
