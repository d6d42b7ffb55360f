//! The trace log: an append-only record of what happened during a run.

use serde::Serialize;
use serde_json::Value;

/// One entry in a [`State`](crate::State)'s trace log.
///
/// Labels emitted by the node executor follow the shape
/// `name:STATUS[:durationS]`, e.g. `fetch:OK:0.012s` or
/// `reviewer:TIMEOUT:0.050s`. Caller-supplied labels via
/// [`State::log`](crate::State::log) may be anything.
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Wall-clock time the record was appended, seconds since the
    /// Unix epoch.
    pub ts: f64,
    /// The event label.
    pub label: String,
    /// Caller- or executor-supplied metadata, if any.
    pub metadata: Option<Value>,
}

impl TraceRecord {
    pub(crate) fn new(label: String, metadata: Option<Value>) -> Self {
        Self {
            ts: now_seconds(),
            label,
            metadata,
        }
    }
}

pub(crate) fn now_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// One event in an exported [`TracePayload`]. Mirrors [`TraceRecord`]
/// under the wire names external exporters expect.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    /// Wall-clock time the event was recorded, seconds since the Unix
    /// epoch.
    pub ts: f64,
    /// The event label, e.g. `"fetch:OK:0.012s"`.
    pub event: String,
    /// Caller- or executor-supplied metadata, if any.
    pub metadata: Option<Value>,
}

/// The trace payload external exporters (OTel bridges, JSONL writers,
/// graph-conversion tools) consume. `loomkit-state` only produces this
/// shape — writing it to disk or an OTel wire format is the exporter's
/// job, not ours.
#[derive(Debug, Clone, Serialize)]
pub struct TracePayload {
    /// The run's stable trace identifier.
    pub trace_id: String,
    /// When the payload was exported, seconds since the Unix epoch.
    pub timestamp: f64,
    /// Every trace record collected so far, in emission order.
    pub events: Vec<TraceEvent>,
}

impl From<TraceRecord> for TraceEvent {
    fn from(record: TraceRecord) -> Self {
        Self {
            ts: record.ts,
            event: record.label,
            metadata: record.metadata,
        }
    }
}
