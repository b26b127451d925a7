//! Diagnostics surfaced to the host build.
//!
//! Every entry is forwarded to `tracing` as it is recorded and also kept,
//! so the host can decide how to present a round and tests can assert on
//! exactly what was reported.

use crate::contracts::LOG_PREFIX;
use crate::error::CompileError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message.into(), None);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warn, message.into(), None);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into(), None);
    }

    pub fn warn_at(&mut self, symbol: &str, message: impl Into<String>) {
        self.push(Severity::Warn, message.into(), Some(symbol.to_string()));
    }

    /// Record a compile error at error severity.
    pub fn report(&mut self, err: &CompileError, symbol: Option<&str>) {
        self.push(
            Severity::Error,
            err.to_string(),
            symbol.map(str::to_string),
        );
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }

    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.with_severity(severity)
            .any(|d| d.message.contains(needle))
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    fn push(&mut self, severity: Severity, message: String, symbol: Option<String>) {
        if message.is_empty() {
            return;
        }
        let symbol_field = symbol.as_deref().unwrap_or("");
        match severity {
            Severity::Info => {
                tracing::info!(target: "arouter::compiler", symbol = symbol_field, "{}{}", LOG_PREFIX, message)
            }
            Severity::Warn => {
                tracing::warn!(target: "arouter::compiler", symbol = symbol_field, "{}{}", LOG_PREFIX, message)
            }
            Severity::Error => {
                tracing::error!(target: "arouter::compiler", symbol = symbol_field, "{}{}", LOG_PREFIX, message)
            }
        }
        self.entries.push(Diagnostic {
            severity,
            message,
            symbol,
        });
    }
}
