//! The per-node execution envelope: timeout race, bounded retries,
//! error classification, trace emission.

use crate::error::FlowError;
use crate::node::Node;
use loomkit_state::State;
use std::time::Instant;

/// Invoke a node's body, applying its timeout and retry configuration,
/// and append one trace record per attempt.
///
/// `retries = 0` means exactly one attempt. There is no backoff between
/// attempts. A panic inside the body is not caught — it unwinds the
/// invoking task exactly as an uncaught interrupt would, satisfying
/// "an interrupt/shutdown signal is not caught" without a distinct
/// fatal-signal type.
pub(crate) async fn execute(node: &Node, state: &State) -> Result<bool, FlowError> {
    let attempts = node.config.retries.saturating_add(1);

    for _attempt in 0..attempts {
        let started = Instant::now();
        let outcome = match node.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, node.body.call(state)).await,
            None => Ok(node.body.call(state).await),
        };
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(success)) => {
                state
                    .log(format!("{}:OK:{}", node.name, fmt_duration(elapsed)), None)
                    .await;
                tracing::debug!(node = %node.name, success, "loomkit.node.ok");
                return Ok(success);
            }
            Ok(Err(err)) => {
                state
                    .log(
                        format!(
                            "{}:ERR({}):{}",
                            node.name,
                            err.kind(),
                            fmt_duration(elapsed)
                        ),
                        None,
                    )
                    .await;
                if node.config.raise_errors {
                    tracing::warn!(node = %node.name, error = %err, "loomkit.node.raised");
                    return Err(FlowError::NodeRaised {
                        name: node.name.to_string(),
                        source: err,
                    });
                }
                tracing::debug!(node = %node.name, error = %err, "loomkit.node.err");
            }
            Err(_elapsed) => {
                state
                    .log(
                        format!("{}:TIMEOUT:{}", node.name, fmt_duration(elapsed)),
                        None,
                    )
                    .await;
                tracing::debug!(node = %node.name, "loomkit.node.timeout");
            }
        }
    }

    tracing::warn!(node = %node.name, attempts, "loomkit.node.exhausted");
    Ok(false)
}

fn fmt_duration(d: std::time::Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}
