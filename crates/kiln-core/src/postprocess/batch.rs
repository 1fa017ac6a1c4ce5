/*!
# Batch Driver

Normalizes many independent trees (one per function or file). Trees share no
state, so they are spread over worker threads; results come back in input
order.
*/

use std::thread;

use crossbeam_channel::unbounded;
use tracing::{debug, info};

use crate::ast::Node;
use crate::config::PostprocessConfig;
use crate::diagnostics::Diagnostics;

use super::rules::RuleStats;
use super::{PassContext, TreePostprocessor};

/// Summary of a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub trees: u64,
    pub rewrites: u64,
    pub errors: u64,
}

impl PassSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.errors == 0
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    /// Normalized trees, in input order
    pub trees: Vec<Node>,
    /// Diagnostics of all trees, in tree order
    pub diagnostics: Diagnostics,
    pub stats: Vec<RuleStats>,
    pub summary: PassSummary,
}

enum WorkerMessage {
    Tree {
        index: usize,
        tree: Node,
        diagnostics: Diagnostics,
    },
    Stats(Vec<RuleStats>),
}

/// Normalize independent trees on `config.jobs` worker threads
pub fn postprocess_batch(trees: Vec<Node>, config: &PostprocessConfig) -> BatchOutput {
    let total = trees.len();
    let jobs = config.jobs.clamp(1, total.max(1));
    debug!(trees = total, jobs, "starting batch");

    let (work_tx, work_rx) = unbounded::<(usize, Node)>();
    let (done_tx, done_rx) = unbounded::<WorkerMessage>();

    for item in trees.into_iter().enumerate() {
        // The receiver is alive until the end of this function
        let _ = work_tx.send(item);
    }
    drop(work_tx);

    thread::scope(|scope| {
        for _ in 0..jobs {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                let mut processor = TreePostprocessor::new(config);
                for (index, tree) in work_rx.iter() {
                    let mut ctx = PassContext::new(config.clone());
                    let tree = processor.run(tree, &mut ctx);
                    let message = WorkerMessage::Tree {
                        index,
                        tree,
                        diagnostics: ctx.diagnostics,
                    };
                    if done_tx.send(message).is_err() {
                        return;
                    }
                }
                let _ = done_tx.send(WorkerMessage::Stats(processor.into_stats()));
            });
        }
    });
    drop(done_tx);

    let mut slots: Vec<Option<(Node, Diagnostics)>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);
    let mut stats: Vec<RuleStats> = Vec::new();

    for message in done_rx.iter() {
        match message {
            WorkerMessage::Tree {
                index,
                tree,
                diagnostics,
            } => slots[index] = Some((tree, diagnostics)),
            WorkerMessage::Stats(worker_stats) => merge_stats(&mut stats, &worker_stats),
        }
    }

    let mut output_trees = Vec::with_capacity(total);
    let mut diagnostics = Diagnostics::new();
    for (tree, tree_diagnostics) in slots.into_iter().flatten() {
        output_trees.push(tree);
        diagnostics.extend(tree_diagnostics);
    }

    let summary = PassSummary {
        trees: output_trees.len() as u64,
        rewrites: stats.iter().map(|s| s.rewrites).sum(),
        errors: diagnostics.error_count() as u64,
    };
    info!(
        trees = summary.trees,
        rewrites = summary.rewrites,
        errors = summary.errors,
        "batch normalized"
    );

    BatchOutput {
        trees: output_trees,
        diagnostics,
        stats,
        summary,
    }
}

fn merge_stats(into: &mut Vec<RuleStats>, from: &[RuleStats]) {
    for stats in from {
        match into.iter_mut().find(|s| s.rule_name == stats.rule_name) {
            Some(existing) => existing.merge(stats),
            None => into.push(stats.clone()),
        }
    }
}
