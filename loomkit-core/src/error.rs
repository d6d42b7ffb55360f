//! Error taxonomy for node construction, parsing, and evaluation.

use thiserror::Error;

/// Errors a node body may return.
///
/// Absorbed by the executor into a trace record unless the node was
/// configured with `raise_errors`, in which case it surfaces as
/// [`FlowError::NodeRaised`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node ran to completion but reports failure.
    #[error("{0}")]
    Failed(String),

    /// Catch-all for errors originating from the node's own
    /// dependencies (I/O, a provider call, anything downstream).
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl NodeError {
    /// The short classifier used in `ERR(<kind>)` trace labels: the
    /// variant name in upper-snake form.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeError::Failed(_) => "FAILED",
            NodeError::Other(_) => "OTHER",
        }
    }
}

/// Errors surfaced by [`crate::Flow::run`].
///
/// Validation and cycle errors short-circuit the whole run before any
/// node executes; node failures never appear here unless the node was
/// configured `raise_errors` (see [`NodeError`]).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FlowError {
    /// The expression failed to tokenize or violated the grammar.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The expression referenced a node the registry doesn't know
    /// about.
    #[error("unknown node '{name}' (known nodes: {})", known.join(", "))]
    UnknownNode {
        /// The offending name.
        name: String,
        /// Every name currently registered, for debuggability.
        known: Vec<String>,
    },

    /// A node was registered with an invalid configuration (e.g. a
    /// non-positive timeout).
    #[error("invalid node config: {0}")]
    InvalidConfig(String),

    /// A node name recurred on the sequential path back to itself
    /// without crossing a loop iteration boundary. Fatal — surfaced
    /// before the second invocation begins.
    #[error("cycle detected: {}", path.join(" >> "))]
    Cycle {
        /// The sequential path, ending with the repeated name.
        path: Vec<String>,
    },

    /// A node configured with `raise_errors` returned an error instead
    /// of absorbing it into a failed attempt.
    #[error("node '{name}' raised: {source}")]
    NodeRaised {
        /// The node that raised.
        name: String,
        /// The underlying node error.
        #[source]
        source: NodeError,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
