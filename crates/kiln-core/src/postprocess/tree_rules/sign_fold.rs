use crate::ast::{Node, NodeKind, SignOp};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

/// Folds a unary sign into a directly wrapped numeric literal: `-3` becomes
/// the literal `"-3"`, `+3` the literal `"3"`. Single level only.
pub struct SignFoldRule;

impl RewriteRule for SignFoldRule {
    fn name(&self) -> &'static str {
        "SignFold"
    }

    fn description(&self) -> &'static str {
        "Folds a unary plus/minus into the numeric literal it wraps"
    }

    fn phase(&self) -> Phase {
        Phase::Enter
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(
            &node.kind,
            NodeKind::UnarySign { operand, .. }
                if matches!(operand.kind, NodeKind::NumericLiteral { .. })
        )
    }

    fn rewrite(&self, node: Node, _ctx: &mut PassContext) -> Node {
        if !self.matches(&node) {
            return node;
        }

        let Node {
            kind,
            location,
            fork_context,
        } = node;

        match kind {
            NodeKind::UnarySign { op, operand } => {
                let mut literal = *operand;
                if let NodeKind::NumericLiteral { value, .. } = &mut literal.kind {
                    if op == SignOp::Minus {
                        value.insert(0, '-');
                    }
                }
                literal.fork_context |= fork_context;
                literal
            }
            kind => Node {
                kind,
                location,
                fork_context,
            },
        }
    }
}
