//! Event sink trait and implementations.
//!
//! The sequencer reports run progress through a sink so hosts can watch a
//! flow (a CLI progress line, a dashboard) without the engine knowing how
//! the events are consumed.
//!
//! Event types emitted by the sequencer:
//! `run.started`, `step.success`, `step.degraded`, `run.paused_manual`,
//! `step.manual_resume`, `step.failed`, `run.completed`, `run.failed`.

use async_trait::async_trait;
use tracing::{debug, info, Level};

/// Receives flow events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Emits an event without blocking. Must never panic; delivery
    /// failures are swallowed.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// Discards all events. The default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// Logs events through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event_type: &str, data: &Option<serde_json::Value>) {
        if self.level == Level::DEBUG {
            debug!(event_type = %event_type, event_data = ?data, "Flow event: {}", event_type);
        } else {
            info!(event_type = %event_type, event_data = ?data, "Flow event: {}", event_type);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }
}

/// Collects events in memory, in emission order. Intended for tests.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: parking_lot::Mutex<Vec<(String, Option<serde_json::Value>)>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the emitted event types, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Returns all emitted events with their payloads.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.lock().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.lock().push((event_type.to_string(), data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_records_in_order() {
        let sink = MemoryEventSink::new();
        sink.emit("run.started", None).await;
        sink.try_emit("step.success", Some(serde_json::json!({"step": "a"})));

        assert_eq!(sink.event_types(), vec!["run.started", "step.success"]);
        let events = sink.events();
        assert_eq!(
            events[1].1,
            Some(serde_json::json!({"step": "a"}))
        );
    }

    #[tokio::test]
    async fn test_noop_sink_discards() {
        let sink = NoOpEventSink;
        sink.emit("run.started", None).await;
        sink.try_emit("run.completed", None);
    }
}
