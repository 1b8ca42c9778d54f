//! Diagnostic channel for resolution failures.
//!
//! Every failure the engine surfaces (environment bootstrap, unknown or
//! failed keys, rejected markers) is first described to a [`Reporter`] and
//! only then returned to the caller. The CLI prints diagnostics to stderr via
//! [`ConsoleReporter`]; tests collect them with [`MemoryReporter`].

use std::fmt;
use std::sync::{Mutex, PoisonError};

use console::{style, Term};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A key was requested that the configuration never declared.
    UnknownKey,
    /// A declared key could not be resolved.
    KeyFailed,
    /// The variable resolver rejected a deferred marker.
    MarkerFailed,
    /// The environment name could not be inferred.
    BootstrapFailed,
}

impl DiagnosticKind {
    /// Human-readable headline for this kind.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::UnknownKey => "Env resolution not defined for",
            Self::KeyFailed => "Env resolution failed for",
            Self::MarkerFailed => "Unable to resolve env",
            Self::BootstrapFailed => "Could not infer env name from source",
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The configuration key or source spec concerned.
    pub subject: String,
    /// The underlying error, rendered.
    pub detail: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            kind,
            subject: subject.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ${{{}}}: {}",
            self.kind.headline(),
            self.subject,
            self.detail
        )
    }
}

/// Receives diagnostics emitted by the resolution engine.
pub trait Reporter: Send + Sync {
    /// Record a diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Writes styled diagnostics to stderr.
#[derive(Debug)]
pub struct ConsoleReporter {
    term: Term,
}

impl ConsoleReporter {
    /// Create a reporter writing to stderr.
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn render(&self, diagnostic: &Diagnostic) -> String {
        format!(
            "{} {} {}\n  {}",
            style("easyenv =>").for_stderr().green(),
            style(diagnostic.kind.headline()).for_stderr().red(),
            style(format!("${{{}}}", diagnostic.subject))
                .for_stderr()
                .blue(),
            diagnostic.detail
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(subject = %diagnostic.subject, "{}", diagnostic.kind.headline());
        let _ = self.term.write_line(&self.render(diagnostic));
    }
}

/// Collects diagnostics in memory.
///
/// # Example
///
/// ```
/// use easyenv::diagnostics::{Diagnostic, DiagnosticKind, MemoryReporter, Reporter};
///
/// let reporter = MemoryReporter::new();
/// reporter.report(&Diagnostic::new(DiagnosticKind::UnknownKey, "apiKeys", "not declared"));
/// assert_eq!(reporter.diagnostics().len(), 1);
/// assert!(reporter.contains(DiagnosticKind::UnknownKey, "apiKeys"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics recorded so far, in order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a diagnostic of `kind` naming `subject` was recorded.
    pub fn contains(&self, kind: DiagnosticKind, subject: &str) -> bool {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|d| d.kind == kind && d.subject == subject)
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

/// Drops every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
