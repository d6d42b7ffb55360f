//! `Flow` — the entry point. Parses, validates, and evaluates an
//! expression against a shared state, returning the root boolean
//! result.

use crate::error::FlowError;
use crate::eval::{eval, SeqPath};
use crate::node::NodeRegistry;
use crate::token::{self, Token};
use crate::validate;
use loomkit_state::State;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Parses, validates, and runs expressions against a [`NodeRegistry`].
///
/// Tokenization and validation are cached per whitespace-normalized
/// expression string, so repeated runs of the same expression skip
/// straight to evaluation.
pub struct Flow {
    registry: Arc<NodeRegistry>,
    cache: RwLock<HashMap<String, Arc<Vec<Token>>>>,
}

impl Flow {
    /// Build a flow over the given registry.
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry this flow evaluates expressions against.
    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Parse (if not already cached), validate, and evaluate `expr`
    /// against `state`, returning the root expression's boolean
    /// result.
    ///
    /// May return `Err` for a malformed expression, an unknown node, a
    /// cycle detected during evaluation, or a node configured
    /// `raise_errors` that returned an error.
    pub async fn run(&self, expr: &str, state: &State) -> Result<bool, FlowError> {
        let normalized: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        if normalized.is_empty() {
            return Err(FlowError::Syntax("expression cannot be empty".into()));
        }

        let tokens = self.compile(&normalized)?;
        tracing::info!(expr = %normalized, "loomkit.flow.start");
        let result = eval(&tokens, &self.registry, state, 0, tokens.len(), SeqPath::default())
            .await
            .map(|(ok, _names)| ok);
        match &result {
            Ok(ok) => tracing::info!(expr = %normalized, result = ok, "loomkit.flow.finish"),
            Err(err) => tracing::warn!(expr = %normalized, error = %err, "loomkit.flow.fatal"),
        }
        result
    }

    fn compile(&self, normalized: &str) -> Result<Arc<Vec<Token>>, FlowError> {
        if let Some(cached) = self
            .cache
            .read()
            .expect("flow cache lock poisoned")
            .get(normalized)
        {
            return Ok(Arc::clone(cached));
        }

        let tokens = token::tokenize(normalized)?;
        validate::validate(&tokens, &self.registry)?;
        let tokens = Arc::new(tokens);
        self.cache
            .write()
            .expect("flow cache lock poisoned")
            .insert(normalized.to_string(), Arc::clone(&tokens));
        Ok(tokens)
    }
}
