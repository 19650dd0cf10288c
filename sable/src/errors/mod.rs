//! Diagnostic definitions.
//!
//! A `Diagnostic` is an immutable record of one problem found in the program. Diagnostics are
//! created by the constructor functions from `kinds` (one per kind), and collected by a
//! `DiagnosticSink` for the duration of a single compilation.

mod kinds;
mod sink;

use crate::source::{InputSpan, InputSpanFile, SourcePosition};
use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use std::fmt::{self, Display, Formatter};

pub use kinds::constructors::*;
pub use sink::{DiagnosticSink, LogReporter, Reporter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Causes compilation to fail.
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Closed set of problems the compiler can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    SyntaxError,
    DuplicateDeclaration,
    UnresolvedSupertype,
    MissingInitializer,
    UnimplementedAbstractMember,
    AbstractMethodInConcreteClass,
    CyclicInheritance,
    RedundantAbstractModifier,
}

impl DiagnosticKind {
    /// Unique code identifying the kind.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::SyntaxError => "E0001",
            DiagnosticKind::DuplicateDeclaration => "E0002",
            DiagnosticKind::UnresolvedSupertype => "E0003",
            DiagnosticKind::MissingInitializer => "E0004",
            DiagnosticKind::UnimplementedAbstractMember => "E0005",
            DiagnosticKind::AbstractMethodInConcreteClass => "E0006",
            DiagnosticKind::CyclicInheritance => "E0007",
            DiagnosticKind::RedundantAbstractModifier => "W0001",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::RedundantAbstractModifier => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,

    /// Short (single-line) message describing the problem.
    pub message: String,

    /// Location in code where the problem occurred.
    pub location: InputSpan,

    /// Extended description of the problem that is shown directly next to code.
    pub subtitle: Option<String>,

    /// Useful information related to the problem, bound to some location in code.
    pub bound_notes: Vec<(InputSpan, String)>,

    /// Useful information related to the problem, not bound to any location.
    pub free_notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    ///
    /// Constructor functions from `kinds` should be used from the outside of this module.
    fn new(kind: DiagnosticKind, message: impl Into<String>, location: InputSpan) -> Diagnostic {
        Diagnostic {
            kind,
            severity: kind.severity(),
            message: message.into(),
            location,
            subtitle: None,
            bound_notes: Vec::new(),
            free_notes: Vec::new(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn position(&self) -> SourcePosition {
        self.location.position()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Annotates a diagnostic with a subtitle to be displayed next to the primary location.
    fn with_subtitle(self, subtitle: impl Into<String>) -> Diagnostic {
        Diagnostic {
            subtitle: Some(subtitle.into()),
            ..self
        }
    }

    /// Annotates a diagnostic with a note referring to an auxiliary location in code.
    fn with_bound_note(mut self, location: InputSpan, note: impl Into<String>) -> Diagnostic {
        self.bound_notes.push((location, note.into()));
        self
    }

    /// Annotates a diagnostic with a note only when `location` is present.
    fn maybe_with_bound_note<N: Into<String>>(
        self,
        location: Option<InputSpan>,
        note: impl FnOnce() -> N,
    ) -> Diagnostic {
        if let Some(location) = location {
            self.with_bound_note(location, note())
        } else {
            self
        }
    }

    /// Annotates a diagnostic with a note that cannot be linked to source code in a meaningful
    /// way.
    fn with_free_note(mut self, note: impl Into<String>) -> Diagnostic {
        self.free_notes.push(note.into());
        self
    }

    /// Builds a `codespan_reporting` diagnostic that can be used for displaying the problem.
    pub fn to_codespan<I: Copy>(&self, user_program_id: I, prelude_id: I) -> CodespanDiagnostic<I> {
        let file_id = |span: &InputSpan| match span.file {
            InputSpanFile::UserProgram => user_program_id,
            InputSpanFile::Prelude => prelude_id,
        };

        let mut labels = Vec::new();

        let primary = Label::primary(file_id(&self.location), self.location.start..self.location.end);
        labels.push(match self.subtitle {
            Some(ref subtitle) => primary.with_message(subtitle),
            None => primary,
        });

        for (location, note) in &self.bound_notes {
            labels.push(
                Label::secondary(file_id(location), location.start..location.end)
                    .with_message(note),
            );
        }

        let diagnostic = match self.severity {
            Severity::Error => CodespanDiagnostic::error(),
            Severity::Warning => CodespanDiagnostic::warning(),
        };

        diagnostic
            .with_code(self.code())
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.free_notes.clone())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.location.line,
            self.location.column,
            self.severity,
            self.code(),
            self.message
        )
    }
}
