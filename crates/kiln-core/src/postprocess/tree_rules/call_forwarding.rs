/*!
# Call Forwarding

`call_user_func_array("foo", $args)` is rewritten into a direct call
`foo(...$args)`. The callee must be a constant string; anything else is a
compile error and the call is left as written.
*/

use crate::ast::{CallKind, Location, Node, NodeKind};
use crate::diagnostics::{Diagnostic, PostprocessError};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

pub const CALL_FORWARDING_FUNCTION: &str = "call_user_func_array";

pub struct CallForwardingRule;

impl RewriteRule for CallForwardingRule {
    fn name(&self) -> &'static str {
        "CallForwarding"
    }

    fn description(&self) -> &'static str {
        "Rewrites call_user_func_array(\"f\", $args) into f(...$args)"
    }

    fn phase(&self) -> Phase {
        Phase::Enter
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(
            &node.kind,
            NodeKind::Call { name, kind: CallKind::Function, .. }
                if name == CALL_FORWARDING_FUNCTION
        )
    }

    fn rewrite(&self, node: Node, ctx: &mut PassContext) -> Node {
        let Node {
            kind,
            location,
            fork_context,
        } = node;

        let (name, args) = match kind {
            NodeKind::Call {
                name,
                args,
                kind: CallKind::Function,
            } => (name, args),
            kind => {
                return Node {
                    kind,
                    location,
                    fork_context,
                }
            }
        };

        let got = args.len();
        let [callee, forwarded] = match <[Node; 2]>::try_from(args) {
            Ok(pair) => pair,
            Err(args) => {
                ctx.diagnostics.report(Diagnostic::error(
                    location.clone(),
                    PostprocessError::CallForwardingArity { got },
                ));
                return function_call(name, args, location, fork_context);
            }
        };

        let target = match &callee.kind {
            NodeKind::StringLiteral(value) => Some(value.clone()),
            _ => None,
        };
        let Some(target) =
            ctx.diagnostics
                .require(target, &location, PostprocessError::CallForwardingTarget)
        else {
            return function_call(name, vec![callee, forwarded], location, fork_context);
        };

        let spread_location = forwarded.location.clone();
        let spread = Node::spread(forwarded, spread_location.clone());
        let mut call = Node::call(target, vec![spread], spread_location);
        call.fork_context = fork_context;
        call
    }
}

fn function_call(name: String, args: Vec<Node>, location: Location, fork_context: bool) -> Node {
    let mut call = Node::call(name, args, location);
    call.fork_context = fork_context;
    call
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostprocessConfig;

    fn loc(line: u32) -> Location {
        Location::new("forward.php", line)
    }

    fn forward(args: Vec<Node>) -> Node {
        Node::call(CALL_FORWARDING_FUNCTION, args, loc(1))
    }

    #[test]
    fn test_constant_target_is_forwarded() {
        let mut ctx = PassContext::new(PostprocessConfig::default());
        let call = forward(vec![Node::string("foo", loc(1)), Node::var("args", loc(2))]);

        assert!(CallForwardingRule.matches(&call));
        let result = CallForwardingRule.rewrite(call, &mut ctx);

        match &result.kind {
            NodeKind::Call { name, args, kind } => {
                assert_eq!(name, "foo");
                assert_eq!(*kind, CallKind::Function);
                assert_eq!(args.len(), 1);
                assert_eq!(args[0].location, loc(2));
                match &args[0].kind {
                    NodeKind::SpreadArgs(inner) => assert_eq!(**inner, Node::var("args", loc(2))),
                    other => panic!("Expected SpreadArgs, got {:?}", other),
                }
            }
            other => panic!("Expected Call, got {:?}", other),
        }
        assert_eq!(result.location, loc(2));
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_non_constant_target_reports_once() {
        let mut ctx = PassContext::new(PostprocessConfig::default());
        let call = forward(vec![Node::var("notAString", loc(1)), Node::var("args", loc(1))]);

        let result = CallForwardingRule.rewrite(call.clone(), &mut ctx);
        assert_eq!(result, call);

        let diags: Vec<Diagnostic> = ctx.diagnostics.into_vec();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].error, PostprocessError::CallForwardingTarget);
        assert_eq!(diags[0].location, loc(1));
    }

    #[test]
    fn test_wrong_arity_reports_once() {
        let mut ctx = PassContext::new(PostprocessConfig::default());
        let call = forward(vec![
            Node::var("a", loc(1)),
            Node::var("b", loc(1)),
            Node::var("c", loc(1)),
        ]);

        let result = CallForwardingRule.rewrite(call.clone(), &mut ctx);
        assert_eq!(result, call);

        let diags = ctx.diagnostics.into_vec();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].error, PostprocessError::CallForwardingArity { got: 3 });
    }

    #[test]
    fn test_zero_arguments_do_not_panic() {
        let mut ctx = PassContext::new(PostprocessConfig::default());
        let call = forward(vec![]);
        assert_eq!(CallForwardingRule.rewrite(call.clone(), &mut ctx), call);
        assert_eq!(ctx.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_member_call_with_same_name_is_ignored() {
        let call = Node::member_call(
            CALL_FORWARDING_FUNCTION,
            vec![Node::var("obj", loc(1)), Node::string("foo", loc(1))],
            loc(1),
        );
        assert!(!CallForwardingRule.matches(&call));
    }
}
