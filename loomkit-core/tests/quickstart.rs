//! The end-to-end scenario from the spec's "Quickstart": `fetch`, a
//! conditional `validate`, and its `process`/`error` branches.

use async_trait::async_trait;
use loomkit_core::{Flow, NodeBody, NodeConfig, NodeError, NodeRegistry};
use loomkit_state::State;
use serde_json::json;
use std::sync::Arc;

struct Fetch;

#[async_trait]
impl NodeBody for Fetch {
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        state.set("data", json!({"t": 72, "h": 65})).await;
        Ok(true)
    }
}

struct Validate;

#[async_trait]
impl NodeBody for Validate {
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        Ok(state.get("data", None).await.is_some())
    }
}

struct Process;

#[async_trait]
impl NodeBody for Process {
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        state
            .set("result", json!({"temp_celsius": 22.2, "humidity": 65}))
            .await;
        Ok(true)
    }
}

struct ReportError;

#[async_trait]
impl NodeBody for ReportError {
    async fn call(&self, state: &State) -> Result<bool, NodeError> {
        state.set("error", json!("Invalid data")).await;
        Ok(true)
    }
}

#[tokio::test]
async fn quickstart_validates_and_processes() {
    let registry = Arc::new(NodeRegistry::new());
    registry.register("fetch", Fetch, NodeConfig::default()).unwrap();
    registry
        .register("validate", Validate, NodeConfig::default())
        .unwrap();
    registry
        .register("process", Process, NodeConfig::default())
        .unwrap();
    registry
        .register("error", ReportError, NodeConfig::default())
        .unwrap();
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);

    let result = flow
        .run("fetch >> (validate ? process | error)", &state)
        .await
        .unwrap();

    assert!(result);
    assert_eq!(
        state.get("result", None).await,
        Some(json!({"temp_celsius": 22.2, "humidity": 65}))
    );
    assert_eq!(state.get("error", None).await, None);

    let labels: Vec<String> = state
        .trace()
        .await
        .into_iter()
        .map(|r| r.label.split(':').next().unwrap().to_string())
        .collect();
    assert_eq!(labels, vec!["fetch", "validate", "process"]);
}

#[tokio::test]
async fn quickstart_falls_back_to_error_when_data_missing() {
    struct EmptyFetch;

    #[async_trait]
    impl NodeBody for EmptyFetch {
        async fn call(&self, _state: &State) -> Result<bool, NodeError> {
            Ok(true)
        }
    }

    let registry = Arc::new(NodeRegistry::new());
    registry
        .register("fetch", EmptyFetch, NodeConfig::default())
        .unwrap();
    registry
        .register("validate", Validate, NodeConfig::default())
        .unwrap();
    registry
        .register("process", Process, NodeConfig::default())
        .unwrap();
    registry
        .register("error", ReportError, NodeConfig::default())
        .unwrap();
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);

    let result = flow
        .run("fetch >> (validate ? process | error)", &state)
        .await
        .unwrap();

    assert!(result);
    assert_eq!(state.get("error", None).await, Some(json!("Invalid data")));
    assert_eq!(state.get("result", None).await, None);
}
