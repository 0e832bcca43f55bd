//! # Reasoning Event Bus
//!
//! The event bus announces what the background reasoning engine has accomplished:
//! a file's analysis completed, a file's analysis failed, or a developer intent
//! was detected in a file.
//!
//! ## Delivery
//!
//! Two delivery paths are served from every [`EventBus::emit`]:
//!
//! - **Handlers** registered with [`EventBus::on`] run synchronously, in
//!   registration order, on the emitting task. A handler that panics is logged
//!   and skipped; the remaining handlers still run.
//! - **Streams** obtained from [`EventBus::subscribe`] receive a clone of every
//!   event through a broadcast channel, for async consumers such as UI bridges.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │ Scheduler Loop  │    │  Event Bus   │    │   Consumers         │
//! │                 │───▶│  handlers    │───▶│ • refactor advisors │
//! │ • complete      │    │  broadcast   │───▶│ • UI badges         │
//! │ • error         │    │              │    │ • CLI output        │
//! │ • intent        │    │              │    │                     │
//! └─────────────────┘    └──────────────┘    └─────────────────────┘
//! ```
//!
//! Handlers are typed: `bus.on::<AnalysisError>(...)` receives `&AnalysisError`
//! and is never invoked for other topics.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast::{self, Sender};

pub mod events;

pub use events::{
    AnalysisComplete, AnalysisError, EventKind, EventPayload, Intent, IntentDetected,
    ReasoningEvent,
};

const BROADCAST_CAPACITY: usize = 1024;

type Handler = Arc<dyn Fn(&ReasoningEvent) + Send + Sync>;

/// Identifies one registered handler, for [`EventBus::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct EventBus {
    sender: Sender<ReasoningEvent>,
    handlers: RwLock<HashMap<EventKind, Vec<(SubscriptionId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers `handler` for the topic of payload type `P`.
    pub fn on<P, F>(&self, handler: F) -> SubscriptionId
    where
        P: EventPayload,
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let erased: Handler = Arc::new(move |event: &ReasoningEvent| {
            if let Some(payload) = P::from_event(event) {
                handler(payload);
            }
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(P::KIND)
            .or_default()
            .push((id, erased));

        tracing::debug!("Registered handler {:?} for {}", id, P::KIND);
        id
    }

    /// Removes one handler when `id` is given, otherwise every handler for `kind`.
    /// Returns how many handlers were removed.
    pub fn off(&self, kind: EventKind, id: Option<SubscriptionId>) -> usize {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(registered) = handlers.get_mut(&kind) else {
            return 0;
        };

        let before = registered.len();
        match id {
            Some(id) => registered.retain(|(registered_id, _)| *registered_id != id),
            None => registered.clear(),
        }
        let removed = before - registered.len();
        if registered.is_empty() {
            handlers.remove(&kind);
        }

        tracing::debug!("Removed {} handlers for {}", removed, kind);
        removed
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers `payload` to its handlers, then to broadcast subscribers.
    pub fn emit<P: EventPayload>(&self, payload: P) {
        self.publish(payload.into_event());
    }

    pub fn publish(&self, event: ReasoningEvent) {
        self.dispatch(&event);
        self.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReasoningEvent> {
        self.sender.subscribe()
    }

    fn dispatch(&self, event: &ReasoningEvent) {
        let kind = event.kind();
        // Snapshot so handlers can call `on`/`off` without deadlocking.
        let handlers: Vec<(SubscriptionId, Handler)> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        for (id, handler) in handlers {
            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                tracing::error!(
                    "Event handler {:?} for {} panicked on {}: {}",
                    id,
                    kind,
                    event.file_path(),
                    panic_message(panic.as_ref())
                );
            }
        }
    }

    fn send(&self, event: ReasoningEvent) {
        if self.sender.send(event).is_err() {
            // No stream subscribers; handlers were already served.
            tracing::trace!("No receivers for event bus stream");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
