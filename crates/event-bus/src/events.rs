use chrono::{DateTime, Utc};
use insight_store::Insight;
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

#[derive(Clone, Debug, Serialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/events.ts")]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ReasoningEvent {
    AnalysisComplete(AnalysisComplete),
    AnalysisError(AnalysisError),
    IntentDetected(IntentDetected),
}

impl ReasoningEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ReasoningEvent::AnalysisComplete(_) => EventKind::AnalysisComplete,
            ReasoningEvent::AnalysisError(_) => EventKind::AnalysisError,
            ReasoningEvent::IntentDetected(_) => EventKind::IntentDetected,
        }
    }

    pub fn file_path(&self) -> &str {
        match self {
            ReasoningEvent::AnalysisComplete(e) => &e.file_path,
            ReasoningEvent::AnalysisError(e) => &e.file_path,
            ReasoningEvent::IntentDetected(e) => &e.file_path,
        }
    }
}

/// Topic names handlers register against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    AnalysisComplete,
    AnalysisError,
    IntentDetected,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AnalysisComplete => "analysis-complete",
            EventKind::AnalysisError => "analysis-error",
            EventKind::IntentDetected => "intent-detected",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct AnalysisComplete {
    pub file_path: String,
    pub insights: Vec<Insight>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct AnalysisError {
    pub file_path: String,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/events.ts")]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Testing,
    Refactoring,
    Integration,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Intent::Testing => "testing",
            Intent::Refactoring => "refactoring",
            Intent::Integration => "integration",
        })
    }
}

/// A guess at what the developer is doing in a file. Not tied to a location.
#[derive(Clone, Debug, Serialize, TS)]
#[ts(export, export_to = "../../../packages/reasoner/src/events.ts")]
#[serde(rename_all = "camelCase")]
pub struct IntentDetected {
    pub file_path: String,
    pub intent: Intent,
    pub confidence: f32,
    pub detected_at: DateTime<Utc>,
}

/// Binds a payload type to its topic so handlers are checked at compile time.
pub trait EventPayload: Clone + Send + Sync + 'static {
    const KIND: EventKind;

    fn into_event(self) -> ReasoningEvent;

    fn from_event(event: &ReasoningEvent) -> Option<&Self>;
}

macro_rules! impl_event_payload {
    ($payload:ident) => {
        impl EventPayload for $payload {
            const KIND: EventKind = EventKind::$payload;

            fn into_event(self) -> ReasoningEvent {
                ReasoningEvent::$payload(self)
            }

            fn from_event(event: &ReasoningEvent) -> Option<&Self> {
                match event {
                    ReasoningEvent::$payload(payload) => Some(payload),
                    _ => None,
                }
            }
        }
    };
}

impl_event_payload!(AnalysisComplete);
impl_event_payload!(AnalysisError);
impl_event_payload!(IntentDetected);
