//! Kiln command line front end
//!
//! Loads serialized trees, runs the postprocessor over them and reports the
//! normalized trees and diagnostics through a [`Notifier`].

use std::{
    io::{self, Read},
    path::Path,
    str::FromStr,
};

use anyhow::{bail, Result};
use kiln_core::postprocess::RuleStats;
use kiln_core::{
    parse_trees, postprocess_batch, trees_to_json, Node, PassSummary, PostprocessConfig,
};
use tracing::debug;

pub mod notifier;

pub use notifier::{BufferNotifier, ConsoleNotifier, Notifier};

/// Rendering of the normalized trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    Source,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "source" => Ok(OutputFormat::Source),
            other => bail!("unknown output format '{other}', expected 'json' or 'source'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    /// Path to the tree file, `-` for stdin
    pub input: String,
    pub format: OutputFormat,
    pub config: PostprocessConfig,
    /// Print per-rule counters after the trees
    pub show_stats: bool,
}

impl CliOptions {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            format: OutputFormat::default(),
            config: PostprocessConfig::default(),
            show_stats: false,
        }
    }
}

pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(Path::new(input))?)
    }
}

pub fn render_trees(trees: &[Node], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(trees_to_json(trees)?),
        OutputFormat::Source => Ok(trees
            .iter()
            .map(|tree| tree.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

pub fn format_stats(stats: &[RuleStats]) -> Vec<String> {
    stats
        .iter()
        .map(|s| {
            format!(
                "{:<20} applied {:>6}  rewritten {:>6}  diagnostics {:>4}",
                s.rule_name, s.applications, s.rewrites, s.diagnostics
            )
        })
        .collect()
}

/// Normalize the trees of an already loaded JSON document
pub fn process_json(
    json: &str,
    options: &CliOptions,
    notifier: &dyn Notifier,
) -> Result<PassSummary> {
    let trees = parse_trees(json)?;
    debug!(trees = trees.len(), "loaded trees");

    let output = postprocess_batch(trees, &options.config);

    notifier.on_output(&render_trees(&output.trees, options.format)?);
    for diagnostic in output.diagnostics.iter() {
        notifier.on_error(&diagnostic.to_string());
    }
    if options.show_stats {
        for line in format_stats(&output.stats) {
            notifier.on_error(&line);
        }
    }

    Ok(output.summary)
}

/// Load, normalize and report; the summary tells whether errors were found
pub fn run(options: &CliOptions, notifier: &dyn Notifier) -> Result<PassSummary> {
    let json = read_input(&options.input)?;
    process_json(&json, options, notifier)
}
