//! In this pass, every declaration gets its descriptor in the symbol table: types, fields
//! (including `val`/`var` class parameters) and methods. Name collisions are reported here.

use crate::analyzer::AstVisitor;
use crate::ast;
use crate::ast::Modifiers;
use crate::context::CompilerContext;
use crate::errors;
use crate::symbols::{
    ClassDescriptor, ClassId, FieldDescriptor, MethodDescriptor, ParameterDescriptor, ParentName,
    TypeParameterDescriptor,
};
use std::collections::HashSet;
use tracing::{debug, trace};

pub struct SymbolCollectionPass {}

impl SymbolCollectionPass {
    pub fn new() -> SymbolCollectionPass {
        SymbolCollectionPass {}
    }

    fn collect_type_def(&mut self, type_def: &ast::TypeDef, context: &mut CompilerContext) {
        if type_def.kind == ast::TypeDefKind::Trait {
            if let Some(span) = type_def.modifiers.span_of(Modifiers::ABSTRACT) {
                context
                    .diagnostics
                    .push(errors::redundant_abstract_modifier(&type_def.name.text, span));
            }
        }

        let descriptor = ClassDescriptor {
            type_parameters: type_def
                .type_parameters
                .iter()
                .map(|parameter| TypeParameterDescriptor {
                    name: parameter.name.text.clone(),
                    variance: parameter.variance,
                })
                .collect(),
            parent_names: type_def
                .parents
                .iter()
                .filter_map(|parent| parent.name())
                .map(|name| ParentName {
                    name: name.text.clone(),
                    span: name.span,
                })
                .collect(),
            definition_site: Some(type_def.name.span),
            ..ClassDescriptor::new(
                type_def.name.text.clone(),
                type_def.kind,
                type_def.modifiers.flags,
            )
        };

        let class = context.symbols.declare_class(descriptor, context.diagnostics);
        context.globals.register_class(type_def, class);
        trace!(name = %type_def.name.text, kind = type_def.kind.keyword(), "declared type");

        self.collect_class_parameters(type_def, class, context);

        for member in &type_def.members {
            match member {
                ast::Member::Field(field_def) => self.collect_field(field_def, class, context),
                ast::Member::Method(method_def) => self.collect_method(method_def, class, context),
            }
        }
    }

    fn collect_class_parameters(
        &mut self,
        type_def: &ast::TypeDef,
        class: ClassId,
        context: &mut CompilerContext,
    ) {
        context.symbols.check_class_parameters(
            type_def
                .parameters
                .iter()
                .map(|parameter| (parameter.name.text.as_str(), parameter.name.span)),
            context.diagnostics,
        );

        let mut seen = HashSet::new();
        for parameter in &type_def.parameters {
            let first_occurrence = seen.insert(parameter.name.text.as_str());
            let binding = match parameter.binding {
                Some(binding) if first_occurrence => binding,
                _ => continue,
            };

            let field = context.symbols.declare_field(
                FieldDescriptor {
                    name: parameter.name.text.clone(),
                    type_: parameter.type_.clone(),
                    mutable: binding == ast::Binding::Var,
                    is_constructor_parameter: true,
                    has_initializer: true,
                    owner: class,
                    definition_site: Some(parameter.name.span),
                },
                context.diagnostics,
            );
            context.globals.register_parameter_field(parameter, field);
        }
    }

    fn collect_field(
        &mut self,
        field_def: &ast::FieldDef,
        class: ClassId,
        context: &mut CompilerContext,
    ) {
        let field = context.symbols.declare_field(
            FieldDescriptor {
                name: field_def.name.text.clone(),
                type_: field_def.type_.clone(),
                mutable: field_def.mutable,
                is_constructor_parameter: false,
                has_initializer: field_def.has_initializer(),
                owner: class,
                definition_site: Some(field_def.name.span),
            },
            context.diagnostics,
        );
        context.globals.register_field(field_def, field);
    }

    fn collect_method(
        &mut self,
        method_def: &ast::FunctionDef,
        class: ClassId,
        context: &mut CompilerContext,
    ) {
        let parameters = method_def
            .parameters()
            .map(|parameter| ParameterDescriptor {
                name: parameter.name.text.clone(),
                type_: parameter.type_.clone(),
                span: parameter.name.span,
            })
            .collect();

        let method = context.symbols.declare_method(
            MethodDescriptor {
                name: method_def.name.text.clone(),
                modifiers: method_def.modifiers.flags,
                parameters,
                return_type: method_def.return_type.clone(),
                is_abstract: method_def.is_abstract(),
                owner: class,
                definition_site: Some(method_def.name.span),
            },
            context.diagnostics,
        );
        context.globals.register_method(method_def, method);
    }
}

impl AstVisitor for SymbolCollectionPass {
    fn run(&mut self, units: &[&ast::Program], context: &mut CompilerContext) {
        for unit in units {
            for type_def in &unit.definitions {
                self.collect_type_def(type_def, context);
            }
        }

        debug!(
            types = context.symbols.class_ids().count(),
            "collected declarations"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolCollectionPass;
    use crate::analyzer::testing::run_passes;
    use crate::errors::DiagnosticKind;

    fn collect(source: &str) -> Vec<(DiagnosticKind, String)> {
        run_passes(source, &mut [&mut SymbolCollectionPass::new()])
            .into_iter()
            .map(|diagnostic| (diagnostic.kind, diagnostic.message))
            .collect()
    }

    #[test]
    fn clean_program() {
        assert!(collect(
            "abstract class Shape { def area: Double }
             case class Circle(r: Double) extends Shape { def area: Double = r * r }
             object Main { val shapes = 1 }"
        )
        .is_empty());
    }

    #[test]
    fn duplicates_in_every_scope() {
        assert_eq!(
            collect(
                "class A(x: Int, x: Int) {
                    val y = 1
                    def y: Int = 2
                    def f(a: Int, a: Int): Int = a
                 }
                 trait A
                 class Int"
            ),
            vec![
                (
                    DiagnosticKind::DuplicateDeclaration,
                    "parameter `x` is already defined in this scope".to_string()
                ),
                (
                    DiagnosticKind::DuplicateDeclaration,
                    "method `y` is already defined in this scope".to_string()
                ),
                (
                    DiagnosticKind::DuplicateDeclaration,
                    "parameter `a` is already defined in this scope".to_string()
                ),
                (
                    DiagnosticKind::DuplicateDeclaration,
                    "trait `A` is already defined in this scope".to_string()
                ),
                (
                    DiagnosticKind::DuplicateDeclaration,
                    "class `Int` is already defined in this scope".to_string()
                ),
            ]
        );
    }

    #[test]
    fn val_parameter_collides_with_field() {
        assert_eq!(
            collect("case class P(x: Int) { val x = 1 }"),
            vec![(
                DiagnosticKind::DuplicateDeclaration,
                "field `x` is already defined in this scope".to_string()
            )]
        );
    }

    #[test]
    fn abstract_trait_is_a_warning() {
        assert_eq!(
            collect("abstract trait T"),
            vec![(
                DiagnosticKind::RedundantAbstractModifier,
                "redundant `abstract` modifier on trait `T`".to_string()
            )]
        );
    }
}
