//! # Kiln Core
//!
//! Post-parse tree normalization for the Kiln ahead-of-time compiler:
//! - Syntax tree definitions shared by the parser and later stages
//! - Rewrite rules that canonicalize surface idioms (pseudo-builtins,
//!   `call_user_func_array`, `list(...) =`, `->`, signed literals,
//!   superglobals)
//! - Traversal and batch drivers
//! - Compile diagnostics collected without aborting the pass
//!
//! Type inference and code generation consume the normalized trees this
//! crate produces.

#![warn(clippy::all)]

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod interchange;
pub mod postprocess;

// Re-export commonly used types
pub use ast::{Location, Node, NodeKind, ToSource};
pub use config::{MemberAccessFallback, PostprocessConfig};
pub use diagnostics::{Diagnostic, Diagnostics, PostprocessError, Severity};
pub use interchange::{load_trees, parse_trees, trees_to_json};
pub use postprocess::{
    postprocess_batch, postprocess_tree, walk, BatchOutput, PassContext, PassOutput,
    PassSummary, RewriteRule, TreePostprocessor, TreeVisitor,
};

/// Kiln version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for Kiln components
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kiln_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Error types for Kiln core operations
#[derive(thiserror::Error, Debug)]
pub enum KilnError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Kiln core operations
pub type Result<T> = std::result::Result<T, KilnError>;
