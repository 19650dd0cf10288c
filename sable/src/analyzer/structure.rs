//! Stage 1: local structural checks of individual declarations.
//!
//! Every field declared in a class body must have an initializer. Constructor parameters are
//! not visited as fields: their value comes from the constructor call. The checks here only
//! look at the syntax tree, never at the symbol table.

use crate::analyzer::{AstVisitor, MemberContext};
use crate::ast;
use crate::context::CompilerContext;
use crate::errors;
use crate::symbols::{ClassId, FieldId};
use tracing::trace;

pub struct StructuralValidationPass {
    /// Name of the type whose members are currently visited.
    owner_name: String,
}

impl StructuralValidationPass {
    pub fn new() -> StructuralValidationPass {
        StructuralValidationPass {
            owner_name: String::new(),
        }
    }
}

impl AstVisitor for StructuralValidationPass {
    fn enter_class(&mut self, class_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
        self.owner_name = class_def.name.text.clone();
    }

    fn enter_trait(&mut self, trait_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
        self.owner_name = trait_def.name.text.clone();
    }

    fn enter_object(&mut self, object_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
        self.owner_name = object_def.name.text.clone();
    }

    fn visit_field(
        &mut self,
        field_def: &ast::FieldDef,
        _: FieldId,
        _: &MemberContext,
        context: &mut CompilerContext,
    ) {
        if !field_def.has_initializer() {
            trace!(field = %field_def.name.text, owner = %self.owner_name, "missing initializer");
            context
                .diagnostics
                .push(errors::missing_initializer(field_def, &self.owner_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StructuralValidationPass;
    use crate::analyzer::declarations::SymbolCollectionPass;
    use crate::analyzer::testing::run_passes;
    use crate::errors::{Diagnostic, DiagnosticKind};

    fn validate(source: &str) -> Vec<Diagnostic> {
        run_passes(
            source,
            &mut [
                &mut SymbolCollectionPass::new(),
                &mut StructuralValidationPass::new(),
            ],
        )
    }

    #[test]
    fn field_without_initializer() {
        let diagnostics = validate("class C { val x: Int }");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingInitializer);
        assert_eq!(diagnostics[0].message, "field `x` of `C` has no initializer");
        assert_eq!(diagnostics[0].position().line, 1);
        assert_eq!(diagnostics[0].position().column, 15);
        assert_eq!(
            diagnostics[0].free_notes[0],
            "help: add an initializer, for example `val x: Int = ...`, or turn the field into a constructor parameter"
        );
    }

    #[test]
    fn constructor_parameters_are_exempt() {
        assert!(validate("class C(val x: Int, var y: Int, z: Int)").is_empty());
        assert!(validate("case class P(x: Int)").is_empty());
    }

    #[test]
    fn every_field_is_checked() {
        let diagnostics = validate(
            "trait T { var a: Int }
             object O { val b: String; val c = 1 }
             class C { val d
                       val e: Int = 2
                       val f: Int => Int }",
        );

        let fields: Vec<_> = diagnostics
            .iter()
            .map(|d| d.message.split('`').nth(1).unwrap_or("").to_string())
            .collect();
        assert_eq!(fields, vec!["a", "b", "d", "f"]);
    }
}
