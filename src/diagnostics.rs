//! Diagnostic output for formatting calls
//!
//! Formatting never fails, so diagnostics are the only way to see why a
//! bundle was not found or a pattern was skipped. A sink is only invoked
//! when the call enables logging (`log=true`).

use std::sync::{Arc, Mutex};

/// Receiver for advisory diagnostic messages
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "colorcode", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "colorcode", "{}", message);
    }
}

/// Severity of a collected message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Check whether any message of `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, message)| *l == level && message.contains(needle))
    }

    fn record(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/// Per-call handle to an optional sink
#[derive(Clone, Copy, Default)]
pub struct Diagnostics<'a> {
    sink: Option<&'a dyn DiagnosticSink>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(sink: Option<&'a dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// A handle that drops every message
    pub fn silent() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Emit an info message; the closure only runs when a sink is present
    pub fn info(&self, message: impl FnOnce() -> String) {
        if let Some(sink) = self.sink {
            sink.info(&message());
        }
    }

    pub fn error(&self, message: impl FnOnce() -> String) {
        if let Some(sink) = self.sink {
            sink.error(&message());
        }
    }
}
