use crate::errors::{Diagnostic, DiagnosticKind};
use crate::source::InputSpan;

pub fn redundant_abstract_modifier(trait_name: &str, location: InputSpan) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::RedundantAbstractModifier,
        format!("redundant `abstract` modifier on trait `{}`", trait_name),
        location,
    )
    .with_subtitle("traits are always abstract")
    .with_free_note("help: remove the `abstract` modifier")
}
