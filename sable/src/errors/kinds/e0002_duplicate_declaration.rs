use crate::errors::{Diagnostic, DiagnosticKind};
use crate::source::InputSpan;

/// `entity` is the kind of the redefined thing as written in messages, e.g. "class".
pub fn duplicate_declaration(
    entity: &str,
    name: &str,
    location: InputSpan,
    previous: Option<InputSpan>,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::DuplicateDeclaration,
        format!("{} `{}` is already defined in this scope", entity, name),
        location,
    )
    .with_subtitle(format!("attempted to redefine `{}` here", name))
    .maybe_with_bound_note(previous, || format!("`{}` previously defined here", name))
    .with_free_note(format!("help: rename one of the definitions of `{}`", name))
}
