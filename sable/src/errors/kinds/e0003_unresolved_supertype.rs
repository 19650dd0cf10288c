use crate::errors::{Diagnostic, DiagnosticKind};
use crate::source::InputSpan;

pub fn unresolved_supertype(name: &str, subtype_name: &str, location: InputSpan) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnresolvedSupertype,
        format!("cannot find type `{}` to inherit from", name),
        location,
    )
    .with_subtitle("not found in this program")
    .with_free_note(format!(
        "help: define `{}`, or remove it from the parents of `{}`",
        name, subtype_name
    ))
}
