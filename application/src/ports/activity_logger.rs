//! Port for the structured activity log.
//!
//! Defines the [`ActivityLogger`] trait for recording vote and promotion
//! events to an audit trail.
//!
//! This is separate from `tracing`-based diagnostic logs: tracing handles
//! human-readable messages, while this port captures every vote and promotion
//! in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured activity event.
///
/// Each event has a type string and a JSON payload with event-specific
/// fields. Adapters add the timestamp when writing.
pub struct ActivityEvent {
    /// Event type identifier (e.g., "vote_cast", "candidate_promoted").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ActivityEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging activity events.
///
/// `log` is synchronous and non-fallible: a broken audit sink must never turn
/// a recorded vote into a failed one.
pub trait ActivityLogger: Send + Sync {
    /// Record an activity event.
    fn log(&self, event: ActivityEvent);
}

/// No-op implementation for tests and when the activity log is disabled.
pub struct NoActivityLogger;

impl ActivityLogger for NoActivityLogger {
    fn log(&self, _event: ActivityEvent) {}
}
