use crate::ast::{Node, NodeKind};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

/// Desugars `list($a, $b) = expr` into a destructuring node whose operands
/// are the targets followed by the source expression.
pub struct ListDestructureRule;

impl RewriteRule for ListDestructureRule {
    fn name(&self) -> &'static str {
        "ListDestructure"
    }

    fn description(&self) -> &'static str {
        "Turns an assignment to list(...) into a destructuring node"
    }

    fn phase(&self) -> Phase {
        Phase::Enter
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(
            &node.kind,
            NodeKind::Assign { lhs, .. } if matches!(lhs.kind, NodeKind::ListConstructor { .. })
        )
    }

    fn rewrite(&self, node: Node, _ctx: &mut PassContext) -> Node {
        let Node {
            kind,
            location,
            fork_context,
        } = node;

        let kind = match kind {
            NodeKind::Assign { lhs, rhs, doc } => {
                let lhs = *lhs;
                match lhs.kind {
                    NodeKind::ListConstructor { targets } => NodeKind::ListDestructure {
                        targets,
                        source: rhs,
                        doc,
                    },
                    lhs_kind => NodeKind::Assign {
                        lhs: Box::new(Node {
                            kind: lhs_kind,
                            location: lhs.location,
                            fork_context: lhs.fork_context,
                        }),
                        rhs,
                        doc,
                    },
                }
            }
            kind => kind,
        };

        Node {
            kind,
            location,
            fork_context,
        }
    }
}
