//! Compile diagnostics reported by the normalization pass.
//!
//! Diagnostics are a side channel: a rule that reports one still returns a
//! valid node, so traversal of the rest of the tree continues and further
//! independent errors are collected in the same run.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::ast::Location;

/// Hard errors the pass can report
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostprocessError {
    #[error("call_user_func_array expected 2 arguments, got {got}")]
    CallForwardingArity { got: usize },

    #[error("first argument of call_user_func_array must be a constant string")]
    CallForwardingTarget,

    #[error("operator '->' expects property or method call as its right operand")]
    MalformedMemberAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub error: PostprocessError,
}

impl Diagnostic {
    pub fn error(location: Location, error: PostprocessError) -> Self {
        Self {
            severity: Severity::Error,
            location,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.error)
    }
}

/// Accumulating diagnostics collector
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(location = %diagnostic.location, "{}", diagnostic.error);
        self.items.push(diagnostic);
    }

    /// Report `error` at `location` unless `condition` holds.
    ///
    /// Returns `condition`, so callers can branch on the check.
    pub fn report_error(
        &mut self,
        condition: bool,
        location: &Location,
        error: PostprocessError,
    ) -> bool {
        if !condition {
            self.report(Diagnostic::error(location.clone(), error));
        }
        condition
    }

    /// Report `error` at `location` when `value` is `None`.
    ///
    /// The caller falls back to its unrewritten node on `None`:
    ///
    /// ```ignore
    /// let Some(target) = diags.require(string_arg, &loc, err) else {
    ///     return node;
    /// };
    /// ```
    pub fn require<T>(
        &mut self,
        value: Option<T>,
        location: &Location,
        error: PostprocessError,
    ) -> Option<T> {
        self.report_error(value.is_some(), location, error);
        value
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_error_only_on_failed_condition() {
        let mut diags = Diagnostics::new();
        let loc = Location::new("a.php", 3);

        assert!(diags.report_error(true, &loc, PostprocessError::CallForwardingTarget));
        assert!(diags.is_empty());

        assert!(!diags.report_error(false, &loc, PostprocessError::CallForwardingTarget));
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_require_reports_missing_value() {
        let mut diags = Diagnostics::new();
        let loc = Location::new("a.php", 3);

        assert_eq!(
            diags.require(Some("foo"), &loc, PostprocessError::CallForwardingTarget),
            Some("foo")
        );
        assert!(diags.is_empty());

        let missing: Option<&str> =
            diags.require(None, &loc, PostprocessError::CallForwardingTarget);
        assert_eq!(missing, None);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().map(|d| &d.error),
            Some(&PostprocessError::CallForwardingTarget)
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(
            Location::new("index.php", 12),
            PostprocessError::CallForwardingArity { got: 1 },
        );
        assert_eq!(
            diag.to_string(),
            "index.php:12: error: call_user_func_array expected 2 arguments, got 1"
        );
    }
}
