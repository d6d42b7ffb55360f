#![deny(missing_docs)]
//! The core of a minimal agent-orchestration engine: a small algebra of
//! composable asynchronous work units ("nodes") combined by an infix
//! expression DSL whose evaluator is both the parser and the
//! scheduler.
//!
//! Register named nodes against a [`NodeRegistry`], then submit a
//! textual expression to [`Flow::run`] that composes them with
//! sequencing (`>>`), fallback (`|`), conditional (`?`), parallel
//! (`&`), and bounded-retry (`<N>`) operators against a shared
//! [`loomkit_state::State`].
//!
//! Trace persistence, graph conversion, CLI drivers, and node bodies
//! themselves are out of scope here — this crate treats node bodies as
//! opaque asynchronous functions and emits trace records (via
//! [`loomkit_state::State`]) that external exporters may serialize.

mod error;
mod eval;
mod executor;
mod flow;
mod node;
mod token;
mod validate;

pub use error::{FlowError, NodeError};
pub use flow::Flow;
pub use node::{Node, NodeBody, NodeConfig, NodeRegistry};

pub use loomkit_state::{State, TraceEvent, TracePayload, TraceRecord};
