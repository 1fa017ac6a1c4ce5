/*!
# Tree Postprocessor

Normalizes a freshly parsed tree into the smaller vocabulary consumed by type
inference and code generation.

## Architecture

- `RewriteRule`: trait for one syntactically-triggered rewrite
- `TreePostprocessor`: owns the rules and exposes the `on_enter` / `on_exit`
  callbacks
- `TreeVisitor` + `walk`: traversal driver (enter, descend into the
  replacement's children, exit)
- `postprocess_tree` / `postprocess_batch`: run the pass over one tree or
  many independent trees

## Example Usage

```rust
use kiln_core::ast::{Location, Node};
use kiln_core::postprocess::postprocess_tree;
use kiln_core::PostprocessConfig;

let loc = Location::new("index.php", 1);
let tree = Node::call("intval", vec![Node::var("x", loc.clone())], loc);

let output = postprocess_tree(tree, &PostprocessConfig::default());
assert_eq!(output.tree.to_string(), "@conv_int($x)");
assert!(output.diagnostics.is_empty());
```
*/

pub mod batch;
pub mod rules;
pub mod tree_rules;

pub use batch::{postprocess_batch, BatchOutput, PassSummary};
pub use rules::{Phase, RewriteRule, RuleStats};

use tracing::trace;

use crate::ast::Node;
use crate::config::PostprocessConfig;
use crate::diagnostics::Diagnostics;

/// State threaded through every rule application on one tree
#[derive(Debug, Clone, Default)]
pub struct PassContext {
    pub config: PostprocessConfig,
    pub diagnostics: Diagnostics,
}

impl PassContext {
    pub fn new(config: PostprocessConfig) -> Self {
        Self {
            config,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Callbacks invoked by [`walk`]
pub trait TreeVisitor {
    /// Called before the node's children are visited
    fn on_enter(&mut self, node: Node) -> Node;

    /// Called after the children of the (possibly replaced) node were visited
    fn on_exit(&mut self, node: Node) -> Node;
}

/// Depth-first traversal: `on_enter`, then the children of whatever
/// `on_enter` returned, then `on_exit`. Each callback's return value replaces
/// the node.
pub fn walk<V>(node: Node, visitor: &mut V) -> Node
where
    V: TreeVisitor + ?Sized,
{
    let node = visitor.on_enter(node);
    let node = node.map_children(|child| walk(child, &mut *visitor));
    visitor.on_exit(node)
}

pub struct TreePostprocessor {
    rules: Vec<Box<dyn RewriteRule>>,
    stats: Vec<RuleStats>,
    collect_stats: bool,
}

impl TreePostprocessor {
    /// Postprocessor with the default rule set
    pub fn new(config: &PostprocessConfig) -> Self {
        Self::with_rules(tree_rules::default_rules(), config)
    }

    pub fn with_rules(rules: Vec<Box<dyn RewriteRule>>, config: &PostprocessConfig) -> Self {
        let stats = rules.iter().map(|r| RuleStats::new(r.name())).collect();
        Self {
            rules,
            stats,
            collect_stats: config.collect_stats,
        }
    }

    /// Add a rule after the existing ones of its phase
    pub fn add_rule(&mut self, rule: Box<dyn RewriteRule>) {
        self.stats.push(RuleStats::new(rule.name()));
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn on_enter(&mut self, node: Node, ctx: &mut PassContext) -> Node {
        self.apply(Phase::Enter, node, ctx)
    }

    pub fn on_exit(&mut self, node: Node, ctx: &mut PassContext) -> Node {
        self.apply(Phase::Exit, node, ctx)
    }

    /// Run the pass over a whole tree
    pub fn run(&mut self, tree: Node, ctx: &mut PassContext) -> Node {
        let mut pass = Pass {
            processor: self,
            ctx,
        };
        walk(tree, &mut pass)
    }

    pub fn stats(&self) -> &[RuleStats] {
        &self.stats
    }

    pub fn into_stats(self) -> Vec<RuleStats> {
        self.stats
    }

    // The rules' input patterns are disjoint, so the first match is the only one.
    fn apply(&mut self, phase: Phase, node: Node, ctx: &mut PassContext) -> Node {
        let Some(index) = self
            .rules
            .iter()
            .position(|rule| rule.phase() == phase && rule.matches(&node))
        else {
            return node;
        };

        let rule = &self.rules[index];
        trace!(
            rule = rule.name(),
            node = node.kind_name(),
            location = %node.location,
            "applying rule"
        );

        let reported_before = ctx.diagnostics.len();
        let result = rule.rewrite(node, ctx);

        if self.collect_stats {
            let reported = (ctx.diagnostics.len() - reported_before) as u64;
            let stats = &mut self.stats[index];
            stats.applications += 1;
            stats.diagnostics += reported;
            if reported == 0 {
                stats.rewrites += 1;
            }
        }

        result
    }
}

struct Pass<'a> {
    processor: &'a mut TreePostprocessor,
    ctx: &'a mut PassContext,
}

impl TreeVisitor for Pass<'_> {
    fn on_enter(&mut self, node: Node) -> Node {
        self.processor.on_enter(node, self.ctx)
    }

    fn on_exit(&mut self, node: Node) -> Node {
        self.processor.on_exit(node, self.ctx)
    }
}

/// Result of normalizing one tree
#[derive(Debug)]
pub struct PassOutput {
    pub tree: Node,
    pub diagnostics: Diagnostics,
    pub stats: Vec<RuleStats>,
}

/// Normalize a single tree with the default rules
pub fn postprocess_tree(tree: Node, config: &PostprocessConfig) -> PassOutput {
    let mut processor = TreePostprocessor::new(config);
    let mut ctx = PassContext::new(config.clone());
    let tree = processor.run(tree, &mut ctx);

    PassOutput {
        tree,
        diagnostics: ctx.diagnostics,
        stats: processor.into_stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Location, NodeKind, SignOp};

    fn loc() -> Location {
        Location::new("walk.php", 1)
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TreeVisitor for Recorder {
        fn on_enter(&mut self, node: Node) -> Node {
            self.events.push(format!("enter {}", node.kind_name()));
            node
        }

        fn on_exit(&mut self, node: Node) -> Node {
            self.events.push(format!("exit {}", node.kind_name()));
            node
        }
    }

    #[test]
    fn test_walk_order() {
        let tree = Node::unary(SignOp::Minus, Node::var("x", loc()), loc());
        let mut recorder = Recorder::default();
        walk(tree, &mut recorder);

        assert_eq!(
            recorder.events,
            vec!["enter UnarySign", "enter VarRef", "exit VarRef", "exit UnarySign"]
        );
    }

    #[test]
    fn test_nested_builtins_rewrite_inside_replacement() {
        let tree = Node::call(
            "intval",
            vec![Node::call("strval", vec![Node::var("x", loc())], loc())],
            loc(),
        );
        let output = postprocess_tree(tree, &PostprocessConfig::default());
        assert_eq!(output.tree.to_string(), "@conv_int(@conv_string($x))");
    }

    #[test]
    fn test_sign_fold_replacement_is_not_revisited_as_unary() {
        let tree = Node::unary(SignOp::Minus, Node::int("5", loc()), loc());
        let output = postprocess_tree(tree, &PostprocessConfig::default());
        assert!(matches!(
            output.tree.kind,
            NodeKind::NumericLiteral { ref value, .. } if value == "-5"
        ));
    }

    #[test]
    fn test_stats_count_applications_and_diagnostics() {
        let tree = Node::block(
            vec![
                Node::call("pow", vec![Node::int("2", loc()), Node::int("3", loc())], loc()),
                Node::call("call_user_func_array", vec![Node::var("f", loc())], loc()),
            ],
            loc(),
        );
        let output = postprocess_tree(tree, &PostprocessConfig::default());

        let find = |name: &str| {
            output
                .stats
                .iter()
                .find(|s| s.rule_name == name)
                .cloned()
                .unwrap()
        };
        assert_eq!(find("BuiltinIntrinsic").rewrites, 1);
        let forwarding = find("CallForwarding");
        assert_eq!(forwarding.applications, 1);
        assert_eq!(forwarding.rewrites, 0);
        assert_eq!(forwarding.diagnostics, 1);
    }

    #[test]
    fn test_stats_disabled() {
        let config = PostprocessConfig::default().collect_stats(false);
        let tree = Node::call("strval", vec![Node::var("x", loc())], loc());
        let output = postprocess_tree(tree, &config);
        assert!(output.stats.iter().all(|s| s.applications == 0));
    }
}
