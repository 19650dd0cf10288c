//! Stage 2: inheritance obligations.
//!
//! A concrete class or an object must implement every abstract method it inherits, and it
//! must not declare abstract methods itself. Traits and `abstract` classes are free to leave
//! methods abstract. Methods are matched by name and number of parameters.

use crate::analyzer::{AstVisitor, MemberContext};
use crate::ast;
use crate::context::CompilerContext;
use crate::errors;
use crate::source::InputSpan;
use crate::symbols::{ClassId, MethodId};
use tracing::trace;

pub struct InheritanceObligationPass {}

impl InheritanceObligationPass {
    pub fn new() -> InheritanceObligationPass {
        InheritanceObligationPass {}
    }

    fn check_implementations(&mut self, class: ClassId, context: &mut CompilerContext) {
        let descriptor = context.symbols.class(class);
        if descriptor.may_be_incomplete() {
            return;
        }

        for method in context.symbols.abstract_members_of(class) {
            let method = context.symbols.method(method);

            // Reported by `enter_func` as an abstract method in a concrete class.
            if method.owner == class {
                continue;
            }

            trace!(class = %descriptor.name, method = %method.signature(), "unimplemented");
            let declared_in = context.symbols.class(method.owner);
            context.diagnostics.push(errors::unimplemented_abstract_member(
                descriptor,
                method,
                declared_in,
                descriptor
                    .definition_site
                    .unwrap_or_else(InputSpan::top_of_file),
            ));
        }
    }
}

impl AstVisitor for InheritanceObligationPass {
    fn enter_class(&mut self, _: &ast::TypeDef, class: ClassId, context: &mut CompilerContext) {
        self.check_implementations(class, context);
    }

    fn enter_object(&mut self, _: &ast::TypeDef, object: ClassId, context: &mut CompilerContext) {
        self.check_implementations(object, context);
    }

    fn enter_func(
        &mut self,
        _: &ast::FunctionDef,
        method: MethodId,
        _: &MemberContext,
        context: &mut CompilerContext,
    ) {
        let method = context.symbols.method(method);
        if !method.is_abstract {
            return;
        }

        let owner = context.symbols.class(method.owner);
        if !owner.may_be_incomplete() {
            context.diagnostics.push(errors::abstract_method_in_concrete_class(
                method,
                owner,
                method.definition_site.unwrap_or_else(InputSpan::top_of_file),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InheritanceObligationPass;
    use crate::analyzer::declarations::SymbolCollectionPass;
    use crate::analyzer::supertypes::SupertypeResolutionPass;
    use crate::analyzer::testing::{analyze, run_passes};
    use crate::errors::{Diagnostic, DiagnosticKind};

    fn check(source: &str) -> Vec<Diagnostic> {
        run_passes(
            source,
            &mut [
                &mut SymbolCollectionPass::new(),
                &mut SupertypeResolutionPass::new(),
                &mut InheritanceObligationPass::new(),
            ],
        )
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
        diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn unimplemented_inherited_method() {
        let diagnostics = check(
            "abstract class A { def f: Int }
             class B extends A {}",
        );

        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnimplementedAbstractMember]);
        assert_eq!(
            diagnostics[0].message,
            "class `B` does not implement abstract method `f` inherited from `A`"
        );
        // Reported at the concrete class, not at the abstract declaration.
        assert_eq!(diagnostics[0].location.line, 2);
        assert_eq!(diagnostics[0].bound_notes[0].0.line, 1);
    }

    #[test]
    fn implemented_through_any_chain_member() {
        assert!(check(
            "trait Shape { def area: Double; def name: String }
             trait Named { def name: String = \"shape\" }
             abstract class Base extends Shape { def area: Double = 0.0 }
             class Square extends Base with Named
             object Single extends Shape with Named { def area: Double = 1.0 }",
        )
        .is_empty());
    }

    #[test]
    fn arity_distinguishes_signatures() {
        let diagnostics = check(
            "trait T { def f(x: Int): Int }
             class C extends T { def f: Int = 1 }",
        );
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnimplementedAbstractMember]);
    }

    #[test]
    fn abstract_method_in_concrete_class() {
        let diagnostics = check("class A { def f: Int }");

        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::AbstractMethodInConcreteClass]);
        assert_eq!(diagnostics[0].message, "abstract method `f` in concrete class `A`");
    }

    #[test]
    fn abstract_method_in_object() {
        let diagnostics = check("object O { def run(): Unit }");
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::AbstractMethodInConcreteClass]);
    }

    #[test]
    fn abstract_members_allowed_in_traits_and_abstract_classes() {
        assert!(check(
            "trait T { def f: Int }
             abstract class A extends T { def g(x: Int): Int }",
        )
        .is_empty());
    }

    #[test]
    fn checks_do_not_mask_each_other() {
        let diagnostics = check(
            "trait T { def f: Int; def g: Int }
             class A extends T { def h: Int }
             class B extends T { def f: Int = 1 }",
        );

        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::UnimplementedAbstractMember,
                DiagnosticKind::UnimplementedAbstractMember,
                DiagnosticKind::AbstractMethodInConcreteClass,
                DiagnosticKind::UnimplementedAbstractMember,
            ]
        );
    }

    #[test]
    fn prelude_function_traits() {
        let diagnostics = check(
            "class Inc extends Function1[Int, Int] { def apply(x: Int): Int = x + 1 }
             class Broken extends Function0[Int]",
        );
        assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnimplementedAbstractMember]);
        assert_eq!(diagnostics[0].location.line, 2);
    }

    #[test]
    fn unresolved_parent_does_not_hide_other_obligations() {
        let (diagnostics, symbols) = analyze(
            "trait T { def f: Int }
             class B extends Missing with T",
            true,
            &mut [
                &mut SymbolCollectionPass::new(),
                &mut SupertypeResolutionPass::new(),
                &mut InheritanceObligationPass::new(),
            ],
        );

        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::UnresolvedSupertype,
                DiagnosticKind::UnimplementedAbstractMember,
            ]
        );

        let b = symbols.lookup_class("B").unwrap();
        let chain: Vec<&str> = symbols
            .resolve_supertype_chain(b)
            .into_iter()
            .map(|id| symbols.class(id).name.as_str())
            .collect();
        assert_eq!(chain, vec!["B", "T", "Any"]);
    }
}
