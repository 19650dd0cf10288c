use crate::ast;
use crate::errors::{Diagnostic, DiagnosticKind};

pub fn missing_initializer(field: &ast::FieldDef, owner_name: &str) -> Diagnostic {
    let keyword = if field.mutable { "var" } else { "val" };
    let type_ = match field.type_ {
        Some(ref type_) => type_.to_string(),
        None => "T".to_string(),
    };

    Diagnostic::new(
        DiagnosticKind::MissingInitializer,
        format!(
            "field `{}` of `{}` has no initializer",
            field.name.text, owner_name
        ),
        field.name.span,
    )
    .with_subtitle("declared without a value")
    .with_free_note(format!(
        "help: add an initializer, for example `{} {}: {} = ...`, or turn the field into a constructor parameter",
        keyword, field.name.text, type_
    ))
}
