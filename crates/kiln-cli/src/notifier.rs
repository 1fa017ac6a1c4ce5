//! Output notification for the command line front end
//!
//! Normalized trees go to one sink and diagnostics to another, so tests can
//! capture both without touching the process streams.

use std::sync::Mutex;

/// Trait for handling postprocessor output
pub trait Notifier: Send + Sync {
    /// Handle rendered trees
    fn on_output(&self, content: &str);

    /// Handle a diagnostic or statistics line
    fn on_error(&self, content: &str);
}

/// Console notifier: output to stdout, diagnostics to stderr
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn on_output(&self, content: &str) {
        if !content.is_empty() {
            println!("{content}");
        }
    }

    fn on_error(&self, content: &str) {
        eprintln!("{content}");
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifier that keeps everything in memory
#[derive(Default)]
pub struct BufferNotifier {
    output: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl BufferNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Notifier for BufferNotifier {
    fn on_output(&self, content: &str) {
        if let Ok(mut output) = self.output.lock() {
            output.push(content.to_string());
        }
    }

    fn on_error(&self, content: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(content.to_string());
        }
    }
}
