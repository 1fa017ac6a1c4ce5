/*!
# Member Access Desugaring

`$obj->name` becomes an instance property access; `$obj->method($a)` becomes
a member call whose first argument is the receiver. Any other right operand
is a compile error.
*/

use crate::ast::{CallKind, Node, NodeKind};
use crate::config::MemberAccessFallback;
use crate::diagnostics::{Diagnostic, PostprocessError};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

/// Marks the call on the right of `->` as a method descriptor before its
/// children are visited, so free-function rules (builtins, call forwarding)
/// skip `$obj->pow($a, $b)`.
pub struct MethodDescriptorRule;

impl RewriteRule for MethodDescriptorRule {
    fn name(&self) -> &'static str {
        "MethodDescriptor"
    }

    fn description(&self) -> &'static str {
        "Tags the call on the right of '->' as a member call"
    }

    fn phase(&self) -> Phase {
        Phase::Enter
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(
            &node.kind,
            NodeKind::MemberAccess { member, .. }
                if matches!(member.kind, NodeKind::Call { kind: CallKind::Function, .. })
        )
    }

    fn rewrite(&self, mut node: Node, _ctx: &mut PassContext) -> Node {
        if let NodeKind::MemberAccess { member, .. } = &mut node.kind {
            if let NodeKind::Call { kind, .. } = &mut member.kind {
                *kind = CallKind::Member;
            }
        }
        node
    }
}

pub struct MemberAccessRule;

impl RewriteRule for MemberAccessRule {
    fn name(&self) -> &'static str {
        "MemberAccess"
    }

    fn description(&self) -> &'static str {
        "Desugars '->' into instance property access or a member call"
    }

    fn phase(&self) -> Phase {
        Phase::Exit
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(node.kind, NodeKind::MemberAccess { .. })
    }

    fn rewrite(&self, node: Node, ctx: &mut PassContext) -> Node {
        let Node {
            kind,
            location,
            fork_context,
        } = node;

        let (base, member) = match kind {
            NodeKind::MemberAccess { base, member } => (base, member),
            kind => {
                return Node {
                    kind,
                    location,
                    fork_context,
                }
            }
        };

        let member = *member;
        let kind = match member.kind {
            NodeKind::Name(property) => NodeKind::InstanceProperty {
                owner: base,
                property,
            },
            NodeKind::Call { name, args, .. } => {
                let mut receiver_args = Vec::with_capacity(args.len() + 1);
                receiver_args.push(*base);
                receiver_args.extend(args);
                NodeKind::Call {
                    name,
                    args: receiver_args,
                    kind: CallKind::Member,
                }
            }
            member_kind => {
                ctx.diagnostics.report(Diagnostic::error(
                    location.clone(),
                    PostprocessError::MalformedMemberAccess,
                ));
                match ctx.config.malformed_member_access {
                    MemberAccessFallback::KeepOriginal => NodeKind::MemberAccess {
                        base,
                        member: Box::new(Node {
                            kind: member_kind,
                            location: member.location,
                            fork_context: member.fork_context,
                        }),
                    },
                    MemberAccessFallback::KeepBase => return *base,
                }
            }
        };

        Node {
            kind,
            location,
            fork_context,
        }
    }
}
