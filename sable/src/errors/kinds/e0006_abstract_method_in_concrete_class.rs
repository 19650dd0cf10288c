use crate::errors::{Diagnostic, DiagnosticKind};
use crate::symbols::{ClassDescriptor, MethodDescriptor};
use crate::source::InputSpan;

pub fn abstract_method_in_concrete_class(
    method: &MethodDescriptor,
    owner: &ClassDescriptor,
    location: InputSpan,
) -> Diagnostic {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::AbstractMethodInConcreteClass,
        format!(
            "abstract method `{}` in concrete {} `{}`",
            method.name,
            owner.kind.keyword(),
            owner.name
        ),
        location,
    )
    .with_subtitle("method has no body")
    .maybe_with_bound_note(owner.definition_site, || {
        format!("`{}` is not abstract", owner.name)
    });

    if owner.kind.is_class() {
        diagnostic.with_free_note(format!(
            "help: provide a body for `{}`, or declare `{}` as `abstract`",
            method.name, owner.name
        ))
    } else {
        diagnostic.with_free_note(format!("help: provide a body for `{}`", method.name))
    }
}
