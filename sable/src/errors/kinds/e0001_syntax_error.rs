use crate::errors::{Diagnostic, DiagnosticKind};
use crate::parser::SyntaxError;

pub fn syntax_error(error: &SyntaxError) -> Diagnostic {
    let diagnostic = Diagnostic::new(DiagnosticKind::SyntaxError, error.message(), error.span());

    match error {
        SyntaxError::UnexpectedToken { expected, .. } => {
            diagnostic.with_subtitle(format!("expected {} here", expected))
        }
        SyntaxError::InvalidCharacter { .. } => {
            diagnostic.with_subtitle("this character cannot appear in a program")
        }
        SyntaxError::InvalidLiteral { .. } => diagnostic
            .with_subtitle("cannot be decoded")
            .with_free_note("help: integer literals must fit into 64 bits, and the supported escape sequences are \\n \\t \\r \\0 \\\\ \\\" \\'"),
        SyntaxError::IllegalModifier { modifier, .. } => diagnostic
            .with_subtitle(format!("`{}` is not allowed here", modifier))
            .with_free_note(format!("help: remove the `{}` modifier", modifier)),
        SyntaxError::ParametersNotAllowed { kind, .. } => diagnostic
            .with_subtitle(format!("{} parameters start here", kind.keyword()))
            .with_free_note("help: only classes take constructor parameters; declare the values as abstract members instead"),
    }
}
