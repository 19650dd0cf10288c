use crate::errors::{Diagnostic, DiagnosticKind};
use crate::source::InputSpan;

/// `cycle` lists the participating types in inheritance order: each one inherits from the
/// next, and the last one inherits from the first. The span is the parent reference that
/// creates the edge to the next type.
pub fn cyclic_inheritance(cycle: &[(String, InputSpan)]) -> Diagnostic {
    let mut path: Vec<String> = cycle.iter().map(|(name, _)| format!("`{}`", name)).collect();
    path.push(format!("`{}`", cycle[0].0));

    let (first_name, first_location) = &cycle[0];
    let mut diagnostic = Diagnostic::new(
        DiagnosticKind::CyclicInheritance,
        format!("cyclic inheritance involving `{}`", first_name),
        *first_location,
    )
    .with_subtitle(format!("`{}` eventually inherits from itself", first_name));

    for (index, (name, location)) in cycle.iter().enumerate().skip(1) {
        let next = &cycle[(index + 1) % cycle.len()].0;
        diagnostic = diagnostic.with_bound_note(
            *location,
            format!("`{}` inherits from `{}` here", name, next),
        );
    }

    diagnostic
        .with_free_note(format!("inheritance path: {}", path.join(" -> ")))
        .with_free_note("help: remove one of the parents to break the cycle")
}
