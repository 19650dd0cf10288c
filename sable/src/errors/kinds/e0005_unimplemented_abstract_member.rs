use crate::errors::{Diagnostic, DiagnosticKind};
use crate::symbols::{ClassDescriptor, MethodDescriptor};
use crate::source::InputSpan;

pub fn unimplemented_abstract_member(
    class: &ClassDescriptor,
    member: &MethodDescriptor,
    declared_in: &ClassDescriptor,
    location: InputSpan,
) -> Diagnostic {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnimplementedAbstractMember,
        format!(
            "{} `{}` does not implement abstract method `{}` inherited from `{}`",
            class.kind.keyword(),
            class.name,
            member.name,
            declared_in.name
        ),
        location,
    )
    .with_subtitle(format!("missing an implementation of `{}`", member.describe()))
    .maybe_with_bound_note(member.definition_site, || {
        format!("`{}` declared abstract here", member.name)
    });

    if class.kind.is_class() {
        diagnostic.with_free_note(format!(
            "help: implement `{}` in `{}`, or declare `{}` as `abstract`",
            member.name, class.name, class.name
        ))
    } else {
        diagnostic.with_free_note(format!(
            "help: implement `{}` in `{}`",
            member.name, class.name
        ))
    }
}
