//! The shared key/value bag every node body reads and writes.

use crate::trace::{now_seconds, TraceEvent, TracePayload, TraceRecord};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

static STATE_SEQ: AtomicU64 = AtomicU64::new(0);

struct Inner {
    data: serde_json::Map<String, Value>,
    trace: Vec<TraceRecord>,
}

/// A thread-safe key/value bag plus an append-only ordered trace log.
///
/// Access mode is configurable at construction: `synchronized = true`
/// serializes every `get`/`set` behind the internal lock and waits for
/// contending tasks; `synchronized = false` assumes single-task use and
/// panics instead of waiting if a concurrent access is ever observed —
/// the same contract a `RefCell` enforces for synchronous borrows, kept
/// here as a runtime check so `State` stays `Send + Sync` regardless of
/// mode and can still be shared across the two branches of a `&` join.
pub struct State {
    inner: RwLock<Inner>,
    synchronized: bool,
    trace_id: String,
}

impl State {
    /// Construct a new state.
    ///
    /// `initial` seeds the key/value bag. `synchronized` picks the
    /// access mode described on the type. `trace_id` pins a stable
    /// identifier for the exported [`TracePayload`]; when absent one is
    /// derived from wall time plus a process-local sequence number so
    /// concurrently constructed states never collide.
    pub fn new(
        initial: Option<serde_json::Map<String, Value>>,
        synchronized: bool,
        trace_id: Option<String>,
    ) -> Self {
        let trace_id = trace_id.unwrap_or_else(|| {
            let seq = STATE_SEQ.fetch_add(1, Ordering::Relaxed);
            format!("{:.0}-{seq}", now_seconds() * 1000.0)
        });
        Self {
            inner: RwLock::new(Inner {
                data: initial.unwrap_or_default(),
                trace: Vec::new(),
            }),
            synchronized,
            trace_id,
        }
    }

    /// The stable identifier attached to this state's exported traces.
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Read a value by key, falling back to `default` if unset.
    pub async fn get(&self, key: &str, default: Option<Value>) -> Option<Value> {
        let inner = self.read().await;
        inner.data.get(key).cloned().or(default)
    }

    /// Write a value. Creates or overwrites.
    pub async fn set(&self, key: impl Into<String>, value: Value) {
        let mut inner = self.write().await;
        inner.data.insert(key.into(), value);
    }

    /// Append a caller-supplied trace entry.
    ///
    /// Trace emission never fails — an exporter that later chokes on a
    /// malformed label or metadata value is the exporter's problem, not
    /// this call's.
    pub async fn log(&self, label: impl Into<String>, metadata: Option<Value>) {
        let mut inner = self.write().await;
        inner.trace.push(TraceRecord::new(label.into(), metadata));
    }

    /// Snapshot the trace log collected so far, in emission order.
    pub async fn trace(&self) -> Vec<TraceRecord> {
        self.read().await.trace.clone()
    }

    /// Export the trace log in the wire shape external exporters
    /// (OTel bridges, JSONL writers) consume.
    pub async fn export(&self) -> TracePayload {
        let inner = self.read().await;
        TracePayload {
            trace_id: self.trace_id.clone(),
            timestamp: now_seconds(),
            events: inner
                .trace
                .iter()
                .cloned()
                .map(TraceEvent::from)
                .collect(),
        }
    }

    async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, Inner> {
        if self.synchronized {
            self.inner.read().await
        } else {
            self.inner
                .try_read()
                .expect("State accessed concurrently in unsynchronized mode")
        }
    }

    async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, Inner> {
        if self.synchronized {
            self.inner.write().await
        } else {
            self.inner
                .try_write()
                .expect("State accessed concurrently in unsynchronized mode")
        }
    }
}
