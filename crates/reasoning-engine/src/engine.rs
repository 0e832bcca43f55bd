use crate::cache::InsightCache;
use crate::collaborators::{FileStore, InsightStore, RefactoringAdvisor, SymbolParser};
use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::pipeline::AnalyzerPipeline;
use crate::queue::TaskQueue;
use crate::scheduler::{LoopStatus, Scheduler, SchedulerState, Shared};
use crate::task::{AnalysisTask, TaskKind, TaskPriority};
use event_bus::{EventBus, EventKind, EventPayload, ReasoningEvent, SubscriptionId};
use insight_store::Insight;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{Notify, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub queue_length: usize,
    pub is_running: bool,
    pub cached_files: usize,
    pub state: SchedulerState,
    pub current_file: Option<String>,
}

pub struct ReasoningEngineBuilder {
    file_store: Arc<dyn FileStore>,
    parser: Arc<dyn SymbolParser>,
    store: Arc<dyn InsightStore>,
    advisor: Option<Arc<dyn RefactoringAdvisor>>,
    event_bus: Option<Arc<EventBus>>,
    config: EngineConfig,
}

impl ReasoningEngineBuilder {
    pub fn new(
        file_store: Arc<dyn FileStore>,
        parser: Arc<dyn SymbolParser>,
        store: Arc<dyn InsightStore>,
    ) -> Self {
        Self {
            file_store,
            parser,
            store,
            advisor: None,
            event_bus: None,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn RefactoringAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Publishes on an existing bus instead of a private one.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn build(self) -> ReasoningEngine {
        let pipeline = Arc::new(AnalyzerPipeline::new(self.config.thresholds.clone()));
        let shared = Shared {
            config: self.config,
            queue: Mutex::new(TaskQueue::new()),
            cache: InsightCache::new(),
            status: Mutex::new(LoopStatus::default()),
            event_bus: self.event_bus.unwrap_or_else(|| Arc::new(EventBus::new())),
            file_store: self.file_store,
            parser: self.parser,
            store: self.store,
            advisor: self.advisor,
            pipeline,
            wake: Notify::new(),
            worker_slot: tokio::sync::Mutex::new(()),
            epoch: AtomicU64::new(0),
        };

        ReasoningEngine {
            inner: Arc::new(Inner {
                shared: Arc::new(shared),
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }
}

#[derive(Default)]
struct Lifecycle {
    cancellation_token: Option<CancellationToken>,
    /// Workers not yet awaited. A stopped worker finishing its in-flight task
    /// stays here alongside the one started after it.
    workers: Vec<JoinHandle<()>>,
}

impl Lifecycle {
    fn is_running(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }
}

struct Inner {
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = lifecycle.cancellation_token.take() {
            token.cancel();
            debug!("ReasoningEngine dropped, scheduler cancelled");
        }
    }
}

/// Background analysis engine.
///
/// Files are queued with [`queue_analysis`](Self::queue_analysis) and analyzed
/// one at a time by a single worker task once [`start`](Self::start) has been
/// called. Results land in an in-memory cache, are persisted through the
/// injected [`InsightStore`] and are announced on the [`EventBus`].
///
/// Clones share the same queue, cache, bus and worker.
#[derive(Clone)]
pub struct ReasoningEngine {
    inner: Arc<Inner>,
}

impl ReasoningEngine {
    pub fn builder(
        file_store: Arc<dyn FileStore>,
        parser: Arc<dyn SymbolParser>,
        store: Arc<dyn InsightStore>,
    ) -> ReasoningEngineBuilder {
        ReasoningEngineBuilder::new(file_store, parser, store)
    }

    fn shared(&self) -> &Shared {
        &self.inner.shared
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.inner
            .lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared().config
    }

    /// Spawns the worker on the current Tokio runtime. Calling it while
    /// already running does nothing.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle();
        if lifecycle.is_running() {
            debug!("ReasoningEngine already running");
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let cancellation_token = CancellationToken::new();
        let scheduler = Scheduler::new(
            Arc::clone(&self.inner.shared),
            cancellation_token.clone(),
        );

        lifecycle.workers.retain(|worker| !worker.is_finished());
        lifecycle.workers.push(handle.spawn(scheduler.run()));
        lifecycle.cancellation_token = Some(cancellation_token);
        info!("ReasoningEngine started");
        Ok(())
    }

    /// Asks the worker to exit after its in-flight task. Calling it while
    /// stopped does nothing.
    pub fn stop(&self) {
        let lifecycle = self.lifecycle();
        if lifecycle.is_running() {
            if let Some(token) = &lifecycle.cancellation_token {
                token.cancel();
            }
            info!("ReasoningEngine stopping");
        }
    }

    /// Stops the engine and waits for every worker it started to exit.
    pub async fn shutdown(&self) {
        self.stop();
        let workers = std::mem::take(&mut self.lifecycle().workers);
        for worker in workers {
            if let Err(e) = worker.await {
                warn!("Scheduler task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    /// Queues `file_path` for a full analysis. Any task already queued for
    /// the same path is replaced.
    pub fn queue_analysis(&self, file_path: &str, priority: TaskPriority) -> AnalysisTask {
        self.queue_analysis_with_kind(file_path, priority, TaskKind::Full)
    }

    pub fn queue_analysis_with_kind(
        &self,
        file_path: &str,
        priority: TaskPriority,
        kind: TaskKind,
    ) -> AnalysisTask {
        let task = self.shared().queue().enqueue(file_path, priority, kind);
        self.shared().wake.notify_one();
        debug!("Queued {} with {} priority", file_path, priority);
        task
    }

    /// Cached insights for `file_path`; empty when it has not been analyzed.
    pub fn get_insights(&self, file_path: &str) -> Vec<Insight> {
        self.shared().cache.get(file_path)
    }

    /// Reads `file_path`'s persisted insights into the cache and returns them.
    ///
    /// When the store has no record the cache is left alone and its current
    /// entry is returned. A store failure is logged and yields an empty set.
    /// A [`clear_cache`](Self::clear_cache) during the load keeps the loaded
    /// record out of the cache.
    pub async fn load_insights(&self, file_path: &str) -> Vec<Insight> {
        let epoch = self.shared().epoch();
        match self.shared().store.load(file_path).await {
            Ok(Some(insights)) => {
                if self
                    .shared()
                    .cache_if_current(epoch, file_path, insights.clone())
                {
                    debug!("Loaded {} insights for {}", insights.len(), file_path);
                } else {
                    debug!("Cache cleared while loading {}, record not cached", file_path);
                }
                insights
            }
            Ok(None) => self.get_insights(file_path),
            Err(e) => {
                warn!("Failed to load insights for {}: {}", file_path, e);
                Vec::new()
            }
        }
    }

    /// Empties the cache and drops every queued task. A result still in
    /// flight is not written into the cleared cache.
    pub fn clear_cache(&self) {
        let shared = self.shared();
        let dropped = {
            let mut queue = shared.queue();
            shared.epoch.fetch_add(1, Ordering::SeqCst);
            shared.cache.clear();
            queue.clear()
        };
        info!("Cleared insight cache and {} queued tasks", dropped);
    }

    pub fn get_queue_status(&self) -> QueueStatus {
        let shared = self.shared();
        let (queue_length, state, current_file) = {
            let queue = shared.queue();
            let status = shared.status();
            (queue.len(), status.state, status.current_file.clone())
        };

        QueueStatus {
            queue_length,
            is_running: self.is_running(),
            cached_files: shared.cache.len(),
            state,
            current_file,
        }
    }

    pub fn on<P, F>(&self, handler: F) -> SubscriptionId
    where
        P: EventPayload,
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.shared().event_bus.on::<P, F>(handler)
    }

    pub fn off(&self, kind: EventKind, id: Option<SubscriptionId>) -> usize {
        self.shared().event_bus.off(kind, id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReasoningEvent> {
        self.shared().event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.shared().event_bus
    }
}
