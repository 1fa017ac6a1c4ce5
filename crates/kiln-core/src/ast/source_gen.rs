// Source text generation from the tree
// Renders nodes back to surface syntax so normalized trees can be read and
// compared in tests and on the command line. Kinds produced only by the
// postprocessor carry an `@` or `:=` marker (`@conv_int($x)`, `$o->@p`,
// `$o->@m($a)`, `list($a) := $x`) so they never read like the input form.

use super::*;

/// Trait for types that can generate their source code representation
pub trait ToSource {
    fn to_source(&self) -> String;
}

fn join_sources(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| n.to_source())
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn with_doc(doc: &Option<String>, body: String) -> String {
    match doc {
        Some(doc) => format!("{doc} {body}"),
        None => body,
    }
}

impl ToSource for Node {
    fn to_source(&self) -> String {
        match &self.kind {
            // Literals
            NodeKind::NumericLiteral { value, .. } => value.clone(),
            NodeKind::StringLiteral(s) => format!("\"{}\"", escape_string(s)),

            // Names and references
            NodeKind::VarRef { name, .. } => format!("${name}"),
            NodeKind::Name(name) => name.clone(),

            // Expressions
            NodeKind::Call { name, args, kind } => match (kind, args.split_first()) {
                (CallKind::Member, Some((receiver, rest))) => {
                    format!("{}->@{}({})", receiver.to_source(), name, join_sources(rest))
                }
                _ => format!("{}({})", name, join_sources(args)),
            },
            NodeKind::UnarySign { op, operand } => {
                format!("{}{}", op.symbol(), operand.to_source())
            }
            NodeKind::Binary { op, left, right } => {
                format!("({} {} {})", left.to_source(), op.symbol(), right.to_source())
            }
            NodeKind::Assign { lhs, rhs, doc } => with_doc(
                doc,
                format!("{} = {}", lhs.to_source(), rhs.to_source()),
            ),
            NodeKind::ListConstructor { targets } => format!("list({})", join_sources(targets)),
            NodeKind::MemberAccess { base, member } => {
                format!("{}->{}", base.to_source(), member.to_source())
            }
            NodeKind::ArrayLiteral(elements) => format!("[{}]", join_sources(elements)),

            // Normalized forms
            NodeKind::ListDestructure {
                targets,
                source,
                doc,
            } => with_doc(
                doc,
                format!("list({}) := {}", join_sources(targets), source.to_source()),
            ),
            NodeKind::InstanceProperty { owner, property } => {
                format!("{}->@{}", owner.to_source(), property)
            }
            NodeKind::Intrinsic { op, operands } => {
                format!("@{}({})", op.as_str(), join_sources(operands))
            }
            NodeKind::SpreadArgs(value) => format!("...{}", value.to_source()),

            // Statements
            NodeKind::ExprStatement(expr) => format!("{};", expr.to_source()),
            NodeKind::Return(Some(value)) => format!("return {};", value.to_source()),
            NodeKind::Return(None) => "return;".to_string(),
            NodeKind::Block(stmts) => {
                let mut result = String::from("{\n");
                for stmt in stmts {
                    for line in stmt.to_source().lines() {
                        result.push_str(&format!("  {line}\n"));
                    }
                }
                result.push('}');
                result
            }
            NodeKind::Function { name, params, body } => {
                format!("function {}({}) {}", name, join_sources(params), body.to_source())
            }
        }
    }
}
