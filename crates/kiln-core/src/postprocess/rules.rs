/*!
# Rewrite Rules

Core trait and bookkeeping for the tree rewrite rules.
*/

use serde::Serialize;

use crate::ast::Node;
use super::PassContext;

/// Traversal callback a rule is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Before the node's children are visited; the walker descends into the
    /// replacement's children
    Enter,
    /// After the (already rewritten) children were visited
    Exit,
}

/// A single syntactically-triggered rewrite
///
/// Rules are stateless. `rewrite` is only called when `matches` returned true
/// for the same node, and always returns a valid node: either the rewritten
/// form or the input unchanged after reporting a diagnostic.
pub trait RewriteRule: Send + Sync {
    /// Human-readable name for this rule
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn phase(&self) -> Phase;

    /// Check if this rule applies to the given node
    fn matches(&self, node: &Node) -> bool;

    /// Rewrite a matching node
    fn rewrite(&self, node: Node, ctx: &mut PassContext) -> Node;
}

/// Per-rule counters
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub rule_name: String,
    /// Times the rule matched a node
    pub applications: u64,
    /// Applications that completed without reporting a diagnostic
    pub rewrites: u64,
    /// Diagnostics reported while the rule ran
    pub diagnostics: u64,
}

impl RuleStats {
    pub fn new(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: &RuleStats) {
        self.applications += other.applications;
        self.rewrites += other.rewrites;
        self.diagnostics += other.diagnostics;
    }

    pub fn rewrite_rate(&self) -> f64 {
        if self.applications == 0 {
            0.0
        } else {
            (self.rewrites as f64) / (self.applications as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_stats_merge() {
        let mut a = RuleStats::new("SignFold");
        a.applications = 2;
        a.rewrites = 1;

        let mut b = RuleStats::new("SignFold");
        b.applications = 2;
        b.rewrites = 2;
        b.diagnostics = 1;

        a.merge(&b);
        assert_eq!(a.applications, 4);
        assert_eq!(a.rewrites, 3);
        assert_eq!(a.diagnostics, 1);
        assert!((a.rewrite_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rewrite_rate_without_applications() {
        assert_eq!(RuleStats::new("Idle").rewrite_rate(), 0.0);
    }
}
