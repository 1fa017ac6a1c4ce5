/*!
# Builtin Intrinsic Resolver

Rewrites calls to pseudo-builtins (`intval($x)`, `pow($a, $b)`, `fork(f())`)
into intrinsic operation nodes that bypass ordinary function resolution.
*/

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::ast::{CallKind, IntrinsicOp, Node, NodeKind};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

/// Operation code and required argument count of a builtin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinSpec {
    pub op: IntrinsicOp,
    pub arity: usize,
}

fn builtin_table() -> &'static HashMap<&'static str, BuiltinSpec> {
    static TABLE: OnceLock<HashMap<&'static str, BuiltinSpec>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let spec = |op, arity| BuiltinSpec { op, arity };
        HashMap::from([
            ("strval", spec(IntrinsicOp::ConvString, 1)),
            ("intval", spec(IntrinsicOp::ConvInt, 1)),
            ("boolval", spec(IntrinsicOp::ConvBool, 1)),
            ("floatval", spec(IntrinsicOp::ConvFloat, 1)),
            ("arrayval", spec(IntrinsicOp::ConvArray, 1)),
            ("uintval", spec(IntrinsicOp::ConvUint, 1)),
            ("longval", spec(IntrinsicOp::ConvLong, 1)),
            ("ulongval", spec(IntrinsicOp::ConvUlong, 1)),
            ("fork", spec(IntrinsicOp::Fork, 1)),
            ("pow", spec(IntrinsicOp::Pow, 2)),
        ])
    })
}

/// Look up a builtin by exact (case-sensitive) name
pub fn lookup_builtin(name: &str) -> Option<BuiltinSpec> {
    builtin_table().get(name).copied()
}

/// Names of all builtins, sorted
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<_> = builtin_table().keys().copied().collect();
    names.sort_unstable();
    names
}

/// Resolve a free-function call against the builtin table.
///
/// A spread argument list has no static arity, so such calls never resolve.
fn resolve(node: &Node) -> Option<BuiltinSpec> {
    match &node.kind {
        NodeKind::Call {
            name,
            args,
            kind: CallKind::Function,
        } => lookup_builtin(name).filter(|spec| {
            spec.arity == args.len()
                && !args.iter().any(|a| matches!(a.kind, NodeKind::SpreadArgs(_)))
        }),
        _ => None,
    }
}

pub struct BuiltinIntrinsicRule;

impl RewriteRule for BuiltinIntrinsicRule {
    fn name(&self) -> &'static str {
        "BuiltinIntrinsic"
    }

    fn description(&self) -> &'static str {
        "Rewrites calls to pseudo-builtins with matching arity into intrinsic operations"
    }

    fn phase(&self) -> Phase {
        Phase::Enter
    }

    fn matches(&self, node: &Node) -> bool {
        resolve(node).is_some()
    }

    fn rewrite(&self, node: Node, _ctx: &mut PassContext) -> Node {
        let Some(spec) = resolve(&node) else {
            return node;
        };

        let Node {
            kind,
            location,
            fork_context,
        } = node;

        match kind {
            NodeKind::Call { mut args, .. } => {
                if spec.op == IntrinsicOp::Fork {
                    if let Some(operand) = args.first_mut() {
                        operand.fork_context = true;
                    }
                }

                let mut intrinsic = Node::new(
                    NodeKind::Intrinsic {
                        op: spec.op,
                        operands: args,
                    },
                    location,
                );
                intrinsic.fork_context = fork_context;
                intrinsic
            }
            kind => Node {
                kind,
                location,
                fork_context,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::config::PostprocessConfig;

    fn loc(line: u32) -> Location {
        Location::new("builtins.php", line)
    }

    fn args(n: usize) -> Vec<Node> {
        (0..n).map(|i| Node::var(format!("a{i}"), loc(1))).collect()
    }

    #[test]
    fn test_every_builtin_rewrites_with_exact_arity() {
        let rule = BuiltinIntrinsicRule;
        let mut ctx = PassContext::new(PostprocessConfig::default());

        for name in builtin_names() {
            let spec = lookup_builtin(name).unwrap();
            let call = Node::call(name, args(spec.arity), loc(4));
            assert!(rule.matches(&call), "{name} should match");

            let result = rule.rewrite(call, &mut ctx);
            match result.kind {
                NodeKind::Intrinsic { op, operands } => {
                    assert_eq!(op, spec.op);
                    let expected: Vec<Node> = args(spec.arity)
                        .into_iter()
                        .map(|mut operand| {
                            operand.fork_context = op == IntrinsicOp::Fork;
                            operand
                        })
                        .collect();
                    assert_eq!(operands, expected);
                }
                other => panic!("Expected Intrinsic for {name}, got {:?}", other),
            }
            assert_eq!(result.location, loc(4));
        }
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_wrong_arity_is_left_alone() {
        let rule = BuiltinIntrinsicRule;
        let mut ctx = PassContext::new(PostprocessConfig::default());

        for name in builtin_names() {
            let spec = lookup_builtin(name).unwrap();
            let mut arities = vec![spec.arity + 1];
            if let Some(fewer) = spec.arity.checked_sub(1) {
                arities.push(fewer);
            }

            for arity in arities {
                let call = Node::call(name, args(arity), loc(5));
                assert!(!rule.matches(&call), "{name} with {arity} args should not match");
                assert_eq!(rule.rewrite(call.clone(), &mut ctx), call);
            }
        }
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_and_wrong_case_names() {
        let rule = BuiltinIntrinsicRule;
        assert!(!rule.matches(&Node::call("my_func", args(1), loc(1))));
        assert!(!rule.matches(&Node::call("INTVAL", args(1), loc(1))));
    }

    #[test]
    fn test_member_calls_are_not_builtins() {
        let rule = BuiltinIntrinsicRule;
        assert!(!rule.matches(&Node::member_call("pow", args(2), loc(1))));
    }

    #[test]
    fn test_spread_arguments_have_no_static_arity() {
        let rule = BuiltinIntrinsicRule;
        let call = Node::call(
            "strval",
            vec![Node::spread(Node::var("args", loc(1)), loc(1))],
            loc(1),
        );
        assert!(!rule.matches(&call));
    }

    #[test]
    fn test_fork_marks_its_operand() {
        let rule = BuiltinIntrinsicRule;
        let mut ctx = PassContext::new(PostprocessConfig::default());

        let call = Node::call("fork", vec![Node::call("work", vec![], loc(2))], loc(2));
        let result = rule.rewrite(call, &mut ctx);

        match result.kind {
            NodeKind::Intrinsic { op, operands } => {
                assert_eq!(op, IntrinsicOp::Fork);
                assert_eq!(operands.len(), 1);
                assert!(operands[0].fork_context);
            }
            other => panic!("Expected Intrinsic, got {:?}", other),
        }
        assert!(!result.fork_context);
    }

    #[test]
    fn test_pow_sets_no_fork_flag() {
        let rule = BuiltinIntrinsicRule;
        let mut ctx = PassContext::new(PostprocessConfig::default());

        let result = rule.rewrite(Node::call("pow", args(2), loc(3)), &mut ctx);
        assert!(!result.fork_context);
        assert!(result.children().iter().all(|c| !c.fork_context));
        assert_eq!(result.to_string(), "@pow($a0, $a1)");
    }
}
