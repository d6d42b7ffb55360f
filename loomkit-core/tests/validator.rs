mod common;

use common::Const;
use loomkit_core::{Flow, FlowError, NodeConfig, NodeRegistry};
use loomkit_state::State;
use std::sync::Arc;

fn registry_with(names: &[&str]) -> Arc<NodeRegistry> {
    let registry = Arc::new(NodeRegistry::new());
    for name in names {
        registry
            .register(*name, Const(true), NodeConfig::default())
            .unwrap();
    }
    registry
}

#[tokio::test]
async fn unknown_node_lists_known_names() {
    let registry = registry_with(&["a", "b"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("missing", &state).await.unwrap_err();
    match err {
        FlowError::UnknownNode { name, known } => {
            assert_eq!(name, "missing");
            assert_eq!(known, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("expected UnknownNode, got {other:?}"),
    }
}

#[tokio::test]
async fn unbalanced_opening_paren_is_rejected() {
    let registry = registry_with(&["a"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("(a", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn unbalanced_closing_paren_is_rejected() {
    let registry = registry_with(&["a"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("a)", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn trailing_operator_is_rejected() {
    let registry = registry_with(&["a"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("a >>", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn leading_operator_is_rejected() {
    let registry = registry_with(&["a"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run(">> a", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn two_parenthesised_operands_in_a_row_are_rejected() {
    // Whitespace is stripped before tokenizing, so only grouping can
    // keep two operands distinct without an operator between them.
    let registry = registry_with(&["a", "b"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("(a)(b)", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn whitespace_between_barewords_is_stripped_before_tokenizing() {
    // "a b" is not two node names; stripping whitespace first makes it
    // the single bareword "ab", matching an unseparated "ab" exactly.
    let registry = registry_with(&["ab"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    assert!(flow.run("a b", &state).await.unwrap());
}

#[tokio::test]
async fn whitespace_merged_bareword_fails_as_unknown_node_when_unregistered() {
    let registry = registry_with(&["a", "b"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("a b", &state).await.unwrap_err();
    match err {
        FlowError::UnknownNode { name, .. } => assert_eq!(name, "ab"),
        other => panic!("expected UnknownNode, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_loop_count_is_rejected() {
    let registry = registry_with(&["a", "b"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let err = flow.run("a <0> b", &state).await.unwrap_err();
    assert!(matches!(err, FlowError::Syntax(_)), "{err:?}");
}

#[tokio::test]
async fn fully_parenthesised_expression_is_accepted() {
    let registry = registry_with(&["a"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    assert!(flow.run("((a))", &state).await.unwrap());
}

#[tokio::test]
async fn validation_runs_before_any_node_executes() {
    // "good" would succeed if invoked, but the expression as a whole is
    // malformed, so it must never run.
    let registry = registry_with(&["good"]);
    let flow = Flow::new(registry);
    let state = State::new(None, true, None);
    let _ = flow.run("good >> missing", &state).await.unwrap_err();
    assert!(state.trace().await.is_empty());
}
