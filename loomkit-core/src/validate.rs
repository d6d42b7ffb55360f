//! Structural validation of a token vector: balanced grouping,
//! alternation of operand/operator, known node names, positive loop
//! counts.

use crate::error::FlowError;
use crate::node::NodeRegistry;
use crate::token::Token;

pub(crate) fn validate(tokens: &[Token], registry: &NodeRegistry) -> Result<(), FlowError> {
    let mut depth: i32 = 0;
    let mut expecting_operand = true;

    for tok in tokens {
        if expecting_operand {
            match tok {
                Token::LParen => depth += 1,
                Token::Name(name) => {
                    if registry.get(name).is_none() {
                        return Err(FlowError::UnknownNode {
                            name: name.to_string(),
                            known: registry.names(),
                        });
                    }
                    expecting_operand = false;
                }
                other => {
                    return Err(FlowError::Syntax(format!(
                        "expected a node name or '(', got {other}"
                    )));
                }
            }
        } else {
            match tok {
                Token::RParen => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(FlowError::Syntax("unmatched closing parenthesis".into()));
                    }
                }
                Token::Loop(n) => {
                    if *n == 0 {
                        return Err(FlowError::Syntax(format!(
                            "loop count must be > 0, got {n}"
                        )));
                    }
                    expecting_operand = true;
                }
                Token::Seq | Token::Fallback | Token::Cond | Token::Parallel => {
                    expecting_operand = true;
                }
                other => {
                    return Err(FlowError::Syntax(format!(
                        "expected an operator or ')', got {other}"
                    )));
                }
            }
        }
    }

    if depth != 0 {
        return Err(FlowError::Syntax("unmatched opening parenthesis".into()));
    }
    if expecting_operand {
        return Err(FlowError::Syntax("expression cannot end with an operator".into()));
    }
    Ok(())
}
