#![deny(missing_docs)]
//! # loomkit — umbrella crate
//!
//! Single import surface over [`loomkit-core`](loomkit_core) (the DSL,
//! evaluator, node registry, and executor) and
//! [`loomkit-state`](loomkit_state) (the shared state container and
//! trace log).
//!
//! ```no_run
//! use loomkit::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), FlowError> {
//! let registry = Arc::new(NodeRegistry::new());
//! // registry.register("fetch", my_node, NodeConfig::default())?;
//! let flow = Flow::new(registry);
//! let state = State::new(None, true, None);
//! let _ok = flow.run("fetch", &state).await?;
//! # Ok(())
//! # }
//! ```

pub use loomkit_core;
pub use loomkit_state;

/// Happy-path imports for composing and running loomkit flows.
pub mod prelude {
    pub use loomkit_core::{Flow, FlowError, Node, NodeBody, NodeConfig, NodeError, NodeRegistry};
    pub use loomkit_state::{State, TraceEvent, TracePayload, TraceRecord};
}
