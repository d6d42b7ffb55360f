//! Nodes: the named, asynchronous units of work an expression
//! composes, and the process-wide registry that maps names to them.

use crate::error::{FlowError, NodeError};
use async_trait::async_trait;
use loomkit_state::State;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// An asynchronous unit of work a node wraps.
///
/// Implemented directly for any `async fn(&State) -> Result<bool, NodeError>`
/// closure-like type via the blanket impl below, so most callers never
/// name this trait.
#[async_trait]
pub trait NodeBody: Send + Sync {
    /// Run the body once against the shared state, reporting success.
    async fn call(&self, state: &State) -> Result<bool, NodeError>;
}

#[async_trait]
impl<F, Fut> NodeBody for F
where
    F: Fn(&State) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<bool, NodeError>> + Send,
{
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        (self)(state).await
    }
}

/// Per-node execution configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Timeout for a single attempt. `None` means no timeout.
    pub timeout: Option<Duration>,
    /// Maximum additional attempts after the first. `0` means exactly
    /// one attempt, no retries.
    pub retries: u32,
    /// If true, an error returned by the body propagates out of
    /// `Flow::run` as [`FlowError::NodeRaised`] instead of being
    /// absorbed into a failed attempt.
    pub raise_errors: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            retries: 0,
            raise_errors: false,
        }
    }
}

/// An immutable, registered node: a name, a body, and an execution
/// envelope. Constructed once via [`NodeRegistry::register`] and never
/// mutated afterward.
pub struct Node {
    pub(crate) name: Arc<str>,
    pub(crate) body: Arc<dyn NodeBody>,
    pub(crate) config: NodeConfig,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish()
    }
}

impl Node {
    /// The node's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's execution configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

/// Process-wide mapping from name to node.
///
/// Last registration under a given name wins — this lets tests rebind
/// a name to a different body between runs. The registry grows
/// monotonically: nodes are never removed. It is read-only for the
/// duration of any [`crate::Flow::run`] call; registration is expected
/// to complete before any run starts.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: RwLock<HashMap<String, Arc<Node>>>,
}

impl NodeRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Idempotent under the same name — re-registering
    /// replaces the previous definition.
    ///
    /// Rejects a non-empty-string-violating name or a non-positive
    /// timeout. A non-async body is rejected at compile time: `body`
    /// must satisfy [`NodeBody`], which only async callables can.
    /// Negative retries are likewise structurally impossible — `retries`
    /// is a `u32`.
    pub fn register(
        &self,
        name: impl Into<String>,
        body: impl NodeBody + 'static,
        config: NodeConfig,
    ) -> Result<Arc<Node>, FlowError> {
        let name = name.into();
        if name.is_empty() {
            return Err(FlowError::InvalidConfig("node name must not be empty".into()));
        }
        if let Some(timeout) = config.timeout {
            if timeout.is_zero() {
                return Err(FlowError::InvalidConfig(format!(
                    "timeout must be > 0, got {timeout:?}"
                )));
            }
        }

        let node = Arc::new(Node {
            name: Arc::from(name.as_str()),
            body: Arc::new(body),
            config,
        });
        self.nodes
            .write()
            .expect("node registry lock poisoned")
            .insert(name, Arc::clone(&node));
        Ok(node)
    }

    /// Look up a node by name.
    pub fn get(&self, name: &str) -> Option<Arc<Node>> {
        self.nodes
            .read()
            .expect("node registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Every currently registered name, sorted for deterministic error
    /// messages.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .read()
            .expect("node registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
