use std::collections::HashSet;
use std::sync::OnceLock;

use crate::ast::{Node, NodeKind, VarScope};
use crate::postprocess::rules::{Phase, RewriteRule};
use crate::postprocess::PassContext;

/// Whether `name` (without the `$`) is a superglobal. Case-sensitive.
pub fn is_superglobal(name: &str) -> bool {
    static NAMES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    NAMES
        .get_or_init(|| {
            HashSet::from([
                "_SERVER", "_GET", "_POST", "_FILES", "_COOKIE", "_REQUEST", "_ENV",
            ])
        })
        .contains(name)
}

/// Tags references to superglobal variables so scope resolution treats them
/// as visible in every function.
pub struct SuperglobalRule;

impl RewriteRule for SuperglobalRule {
    fn name(&self) -> &'static str {
        "Superglobal"
    }

    fn description(&self) -> &'static str {
        "Marks $_SERVER, $_GET, ... variable references as superglobal"
    }

    fn phase(&self) -> Phase {
        Phase::Exit
    }

    fn matches(&self, node: &Node) -> bool {
        matches!(&node.kind, NodeKind::VarRef { name, .. } if is_superglobal(name))
    }

    fn rewrite(&self, mut node: Node, _ctx: &mut PassContext) -> Node {
        if let NodeKind::VarRef { name, scope } = &mut node.kind {
            if is_superglobal(name) {
                *scope = VarScope::Superglobal;
            }
        }
        node
    }
}
