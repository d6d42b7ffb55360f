#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::BoxFuture;
use loomkit_core::{NodeBody, NodeError};
use loomkit_state::State;

/// Wraps a boxed-future-returning closure as a [`NodeBody`], sidestepping
/// the higher-ranked-lifetime friction of plain `async` closures.
pub struct AsyncNode<F>(pub F)
where
    F: for<'a> Fn(&'a State) -> BoxFuture<'a, Result<bool, NodeError>> + Send + Sync;

#[async_trait]
impl<F> NodeBody for AsyncNode<F>
where
    F: for<'a> Fn(&'a State) -> BoxFuture<'a, Result<bool, NodeError>> + Send + Sync,
{
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        (self.0)(state).await
    }
}

/// A node that always returns the same fixed result.
pub struct Const(pub bool);

#[async_trait]
impl NodeBody for Const {
    async fn call(&self, _state: &State) -> Result<bool, NodeError> {
        Ok(self.0)
    }
}

/// A node that always errors.
pub struct Bomb;

#[async_trait]
impl NodeBody for Bomb {
    async fn call(&self, _state: &State) -> Result<bool, NodeError> {
        Err(NodeError::Failed("boom".into()))
    }
}

/// A node that sleeps `millis` then returns `true`.
pub struct Sleeper {
    pub millis: u64,
}

#[async_trait]
impl NodeBody for Sleeper {
    async fn call(&self, _state: &State) -> Result<bool, NodeError> {
        tokio::time::sleep(std::time::Duration::from_millis(self.millis)).await;
        Ok(true)
    }
}

/// A node that always hangs, for timeout tests.
pub struct Hangs {
    pub millis: u64,
}

#[async_trait]
impl NodeBody for Hangs {
    async fn call(&self, _state: &State) -> Result<bool, NodeError> {
        tokio::time::sleep(std::time::Duration::from_millis(self.millis)).await;
        Ok(true)
    }
}
