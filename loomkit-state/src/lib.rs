#![deny(missing_docs)]
//! Shared key/value state and trace log for [`loomkit-core`](https://docs.rs/loomkit-core) flows.
//!
//! `State` is the one shared resource a loomkit [`Flow`](https://docs.rs/loomkit-core)
//! run touches: node bodies read and write through it, and the executor
//! appends a trace record after every node invocation. This crate has no
//! opinion on the DSL or the evaluator — it only owns the data model
//! described by the core's `State` type.

mod state;
mod trace;

pub use state::State;
pub use trace::{TraceEvent, TracePayload, TraceRecord};
