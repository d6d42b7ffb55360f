//! The evaluator: a recursive lowest-precedence split over a token
//! slice that is simultaneously the parser and the scheduler.

use crate::error::FlowError;
use crate::executor;
use crate::node::NodeRegistry;
use crate::token::Token;
use futures::future::BoxFuture;
use loomkit_state::State;
use std::sync::Arc;

/// The sequential path: the chain of node names reached by following
/// `>>`, `|`, `?`, and the implicit sequencing inside `<N>` from the
/// root to the current evaluation point.
///
/// A small persistent (cons) list so extending it along one branch
/// never disturbs another — cheap `O(1)` clone, no locking, and no
/// allocation on the many evaluations that never hit a leaf.
#[derive(Clone, Default)]
pub(crate) struct SeqPath(Option<Arc<PathLink>>);

struct PathLink {
    name: Arc<str>,
    rest: SeqPath,
}

impl SeqPath {
    fn contains(&self, name: &str) -> bool {
        let mut cur = self.0.as_ref();
        while let Some(link) = cur {
            if &*link.name == name {
                return true;
            }
            cur = link.rest.0.as_ref();
        }
        false
    }

    fn push(&self, name: Arc<str>) -> SeqPath {
        SeqPath(Some(Arc::new(PathLink {
            name,
            rest: self.clone(),
        })))
    }

    /// Extend with every name in `names` not already present, in order.
    fn extend(&self, names: &[Arc<str>]) -> SeqPath {
        let mut out = self.clone();
        for name in names {
            if !out.contains(name) {
                out = out.push(Arc::clone(name));
            }
        }
        out
    }

    /// Render root-to-leaf for error messages.
    fn to_vec(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut cur = self.0.as_ref();
        while let Some(link) = cur {
            names.push(link.name.to_string());
            cur = link.rest.0.as_ref();
        }
        names.reverse();
        names
    }
}

/// Union of two name lists, preserving order and dropping duplicates
/// from `b` that already appear in `a`. Mirrors the "set of node names
/// traversed" produced by each sub-evaluation.
fn merge_names(a: &[Arc<str>], b: &[Arc<str>]) -> Vec<Arc<str>> {
    let mut out = a.to_vec();
    for name in b {
        if !out.iter().any(|n| n == name) {
            out.push(Arc::clone(name));
        }
    }
    out
}

/// Evaluate `tokens[start..end]` against `registry`/`state`, threading
/// the sequential path `path` for cycle detection.
///
/// Returns the boolean result together with the set of node names
/// traversed, so callers can extend `path` for their right-hand
/// sub-evaluation.
pub(crate) fn eval<'a>(
    tokens: &'a [Token],
    registry: &'a NodeRegistry,
    state: &'a State,
    start: usize,
    end: usize,
    path: SeqPath,
) -> BoxFuture<'a, Result<(bool, Vec<Arc<str>>), FlowError>> {
    Box::pin(async move {
        if start >= end {
            return Ok((false, Vec::new()));
        }

        if end - start == 1 {
            return eval_leaf(tokens, registry, state, start, path).await;
        }

        let Some((op_idx, _)) = find_top_level_operator(tokens, start, end) else {
            // Fully parenthesised: strip the outer pair and recurse.
            return eval(tokens, registry, state, start + 1, end - 1, path).await;
        };

        match &tokens[op_idx] {
            Token::Loop(n) => eval_loop(tokens, registry, state, start, op_idx, end, *n, path).await,
            Token::Parallel => eval_parallel(tokens, registry, state, start, op_idx, end, path).await,
            Token::Seq | Token::Cond => {
                eval_sequenced(tokens, registry, state, start, op_idx, end, path, true).await
            }
            Token::Fallback => {
                eval_sequenced(tokens, registry, state, start, op_idx, end, path, false).await
            }
            other => unreachable!("{other:?} is not an operator"),
        }
    })
}

async fn eval_leaf<'a>(
    tokens: &'a [Token],
    registry: &'a NodeRegistry,
    state: &'a State,
    idx: usize,
    path: SeqPath,
) -> Result<(bool, Vec<Arc<str>>), FlowError> {
    let Token::Name(name) = &tokens[idx] else {
        // Validation guarantees a lone token is a name.
        return Ok((false, Vec::new()));
    };

    if path.contains(name) {
        let mut full_path = path.to_vec();
        full_path.push(name.to_string());
        return Err(FlowError::Cycle { path: full_path });
    }

    let Some(node) = registry.get(name) else {
        return Ok((false, Vec::new()));
    };

    let success = executor::execute(&node, state).await?;
    Ok((success, vec![Arc::clone(name)]))
}

/// Find the top-level (grouping depth zero) operator with lowest
/// precedence, breaking ties toward the rightmost position — this
/// yields left-associative evaluation for binary operators.
fn find_top_level_operator(tokens: &[Token], start: usize, end: usize) -> Option<(usize, u8)> {
    let mut depth = 0i32;
    let mut best: Option<(usize, u8)> = None;

    for i in start..end {
        match &tokens[i] {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            tok if depth == 0 => {
                if let Some(prec) = tok.precedence() {
                    if best.is_none_or(|(_, best_prec)| prec <= best_prec) {
                        best = Some((i, prec));
                    }
                }
            }
            _ => {}
        }
    }

    best
}

#[allow(clippy::too_many_arguments)]
async fn eval_sequenced<'a>(
    tokens: &'a [Token],
    registry: &'a NodeRegistry,
    state: &'a State,
    start: usize,
    op_idx: usize,
    end: usize,
    path: SeqPath,
    short_circuit_on_false: bool,
) -> Result<(bool, Vec<Arc<str>>), FlowError> {
    let (left_ok, left_names) = eval(tokens, registry, state, start, op_idx, path.clone()).await?;

    // `>>` and `?` share one truth table: skip the right side on
    // left failure. `|` skips the right side on left *success*.
    if short_circuit_on_false {
        if !left_ok {
            return Ok((false, left_names));
        }
    } else if left_ok {
        return Ok((left_ok, left_names));
    }

    let extended = path.extend(&left_names);
    let (right_ok, right_names) =
        eval(tokens, registry, state, op_idx + 1, end, extended).await?;
    Ok((right_ok, merge_names(&left_names, &right_names)))
}

#[allow(clippy::too_many_arguments)]
async fn eval_parallel<'a>(
    tokens: &'a [Token],
    registry: &'a NodeRegistry,
    state: &'a State,
    start: usize,
    op_idx: usize,
    end: usize,
    path: SeqPath,
) -> Result<(bool, Vec<Arc<str>>), FlowError> {
    let left = eval(tokens, registry, state, start, op_idx, path.clone());
    let right = eval(tokens, registry, state, op_idx + 1, end, path);
    let (left, right) = tokio::join!(left, right);
    let (left_ok, left_names) = left?;
    let (right_ok, right_names) = right?;
    Ok((left_ok && right_ok, merge_names(&left_names, &right_names)))
}

#[allow(clippy::too_many_arguments)]
async fn eval_loop<'a>(
    tokens: &'a [Token],
    registry: &'a NodeRegistry,
    state: &'a State,
    start: usize,
    op_idx: usize,
    end: usize,
    n: u64,
    path: SeqPath,
) -> Result<(bool, Vec<Arc<str>>), FlowError> {
    let mut last = false;
    let mut seen: Vec<Arc<str>> = Vec::new();

    for _ in 0..n {
        let (_left_ok, left_names) =
            eval(tokens, registry, state, start, op_idx, path.clone()).await?;
        let extended = path.extend(&left_names);
        let (right_ok, right_names) =
            eval(tokens, registry, state, op_idx + 1, end, extended).await?;
        last = right_ok;
        seen = merge_names(&seen, &merge_names(&left_names, &right_names));
        if right_ok {
            break;
        }
    }

    Ok((last, seen))
}
