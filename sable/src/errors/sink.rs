//! Collection of diagnostics for one compilation.

use crate::errors::{Diagnostic, DiagnosticKind, Severity};
use crate::source::InputSpan;
use tracing::{error, warn};

/// Presentation surface for diagnostics.
pub trait Reporter {
    /// Renders `diagnostics` in the given order.
    fn render(&mut self, diagnostics: &[Diagnostic]);
}

/// Reports diagnostics as structured log events.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn render(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            let position = diagnostic.position();
            match diagnostic.severity {
                Severity::Error => error!(
                    code = diagnostic.code(),
                    line = position.line,
                    column = position.column,
                    "{}",
                    diagnostic.message
                ),
                Severity::Warning => warn!(
                    code = diagnostic.code(),
                    line = position.line,
                    column = position.column,
                    "{}",
                    diagnostic.message
                ),
            }
        }
    }
}

/// Append-only collector of the diagnostics found during a single compilation.
///
/// Reporting a diagnostic never fails and never interrupts the caller: whether compilation may
/// proceed is decided once, by the driver, through `has_error`.
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    reporter: Box<dyn Reporter>,
}

impl DiagnosticSink {
    /// Creates a sink that renders to the log.
    pub fn new() -> DiagnosticSink {
        DiagnosticSink::with_reporter(Box::new(LogReporter))
    }

    pub fn with_reporter(reporter: Box<dyn Reporter>) -> DiagnosticSink {
        DiagnosticSink {
            diagnostics: Vec::new(),
            reporter,
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Records a diagnostic carrying just a kind, a location and a message.
    pub fn report(&mut self, kind: DiagnosticKind, location: InputSpan, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, message, location));
    }

    /// Whether at least one diagnostic of severity `Error` was recorded.
    pub fn has_error(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// All recorded diagnostics, in the order they were reported.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.kind == kind)
    }

    /// Drops all recorded diagnostics, keeping the reporter.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Renders every recorded diagnostic through the reporter. The sink keeps its contents.
    pub fn flush(&mut self) {
        self.reporter.render(&self.diagnostics);
    }
}
