//! Framework for defining analyzer passes that walk the program AST.

use crate::ast;
use crate::ast::TypeDefKind;
use crate::context::CompilerContext;
use crate::symbols::{ClassId, FieldId, MethodId};

/// The class-like declaration a member belongs to.
#[derive(Clone, Copy, Debug)]
pub struct MemberContext {
    pub owner: ClassId,
    pub owner_kind: TypeDefKind,
}

/// Declaration a parameter belongs to.
#[derive(Clone, Copy, Debug)]
pub enum ParamOwner {
    /// Constructor parameter. `field` is set for `val`/`var` parameters.
    Class {
        member: MemberContext,
        field: Option<FieldId>,
    },
    Method(MethodId),
    Closure,
}

/// An analyzer pass that traverses the program AST.
///
/// Implementers only redefine the hooks they care about: a pass concerned with field
/// definitions only needs `visit_field`. All hooks are no-ops by default. `enter_*` hooks are
/// called before the traversal descends into the node, `visit_*` hooks are called for nodes
/// the pass does not need to descend into.
///
/// The traversal always descends into every child, regardless of what a hook reported, so one
/// problem never hides another. Passes report problems only through
/// `context.diagnostics`.
///
/// Hooks receive the symbol table ids of the declarations they visit, so a pass can only run
/// after declarations were collected. The collection pass itself overrides `run`.
pub trait AstVisitor {
    /// Executes the pass over all compilation units, in order.
    fn run(&mut self, units: &[&ast::Program], context: &mut CompilerContext) {
        for unit in units {
            traverse(unit, self, context);
        }
    }

    fn enter_class(&mut self, _class_def: &ast::TypeDef, _class: ClassId, _context: &mut CompilerContext) {}

    fn enter_trait(&mut self, _trait_def: &ast::TypeDef, _trait_: ClassId, _context: &mut CompilerContext) {}

    fn enter_object(&mut self, _object_def: &ast::TypeDef, _object: ClassId, _context: &mut CompilerContext) {}

    fn enter_func(
        &mut self,
        _method_def: &ast::FunctionDef,
        _method: MethodId,
        _member: &MemberContext,
        _context: &mut CompilerContext,
    ) {
    }

    fn visit_field(
        &mut self,
        _field_def: &ast::FieldDef,
        _field: FieldId,
        _member: &MemberContext,
        _context: &mut CompilerContext,
    ) {
    }

    fn visit_param(&mut self, _parameter: &ast::Parameter, _owner: &ParamOwner, _context: &mut CompilerContext) {}

    fn enter_block(&mut self, _block: &ast::BlockExpr, _context: &mut CompilerContext) {}

    fn visit_local(&mut self, _local: &ast::LocalDef, _context: &mut CompilerContext) {}

    /// Called for every expression, in pre-order.
    fn visit_expr(&mut self, _expression: &ast::Expression, _context: &mut CompilerContext) {}
}

/// Walks a compilation unit in declaration order, calling the hooks of `visitor`.
pub fn traverse<V: AstVisitor + ?Sized>(
    program: &ast::Program,
    visitor: &mut V,
    context: &mut CompilerContext,
) {
    for type_def in &program.definitions {
        traverse_type_def(type_def, visitor, context);
    }
}

fn traverse_type_def<V: AstVisitor + ?Sized>(
    type_def: &ast::TypeDef,
    visitor: &mut V,
    context: &mut CompilerContext,
) {
    let class = context.globals.class(type_def);
    match type_def.kind {
        TypeDefKind::Class => visitor.enter_class(type_def, class, context),
        TypeDefKind::Trait => visitor.enter_trait(type_def, class, context),
        TypeDefKind::Object => visitor.enter_object(type_def, class, context),
    }

    let member = MemberContext {
        owner: class,
        owner_kind: type_def.kind,
    };

    for parameter in &type_def.parameters {
        let owner = ParamOwner::Class {
            member,
            field: context.globals.parameter_field(parameter),
        };
        traverse_parameter(parameter, &owner, visitor, context);
    }

    for parent in &type_def.parents {
        for argument in &parent.arguments {
            traverse_expression(argument, visitor, context);
        }
    }

    for member_def in &type_def.members {
        match member_def {
            ast::Member::Field(field_def) => {
                let field = context.globals.field(field_def);
                visitor.visit_field(field_def, field, &member, context);
                if let Some(ref initializer) = field_def.initializer {
                    traverse_expression(initializer, visitor, context);
                }
            }
            ast::Member::Method(method_def) => {
                let method = context.globals.method(method_def);
                visitor.enter_func(method_def, method, &member, context);

                let owner = ParamOwner::Method(method);
                for parameter in method_def.parameters() {
                    traverse_parameter(parameter, &owner, visitor, context);
                }
                if let Some(ref body) = method_def.body {
                    traverse_expression(body, visitor, context);
                }
            }
        }
    }
}

fn traverse_parameter<V: AstVisitor + ?Sized>(
    parameter: &ast::Parameter,
    owner: &ParamOwner,
    visitor: &mut V,
    context: &mut CompilerContext,
) {
    visitor.visit_param(parameter, owner, context);
    if let Some(ref default) = parameter.default {
        traverse_expression(default, visitor, context);
    }
}

/// Walks an expression tree in pre-order.
pub fn traverse_expression<V: AstVisitor + ?Sized>(
    expression: &ast::Expression,
    visitor: &mut V,
    context: &mut CompilerContext,
) {
    visitor.visit_expr(expression, context);

    match expression {
        ast::Expression::Block(block) => {
            visitor.enter_block(block, context);
            for statement in &block.statements {
                match statement {
                    ast::Statement::Local(local) => {
                        visitor.visit_local(local, context);
                        traverse_expression(&local.initializer, visitor, context);
                    }
                    ast::Statement::Expr(expression) => {
                        traverse_expression(expression, visitor, context)
                    }
                }
            }
        }
        ast::Expression::Closure(closure) => {
            for parameter in &closure.parameters {
                traverse_parameter(parameter, &ParamOwner::Closure, visitor, context);
            }
            traverse_expression(&closure.body, visitor, context);
        }
        _ => {
            for child in expression.children() {
                traverse_expression(child, visitor, context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AstVisitor, MemberContext, ParamOwner};
    use crate::analyzer::declarations::SymbolCollectionPass;
    use crate::ast;
    use crate::context::CompilerContext;
    use crate::errors::DiagnosticSink;
    use crate::parser::{parse, tokenize};
    use crate::source::InputSpanFile;
    use crate::symbols::{ClassId, FieldId, MethodId};

    /// Records the order in which hooks are called.
    #[derive(Default)]
    struct Tracer {
        events: Vec<String>,
    }

    impl AstVisitor for Tracer {
        fn enter_class(&mut self, class_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
            self.events.push(format!("class {}", class_def.name.text));
        }

        fn enter_trait(&mut self, trait_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
            self.events.push(format!("trait {}", trait_def.name.text));
        }

        fn enter_object(&mut self, object_def: &ast::TypeDef, _: ClassId, _: &mut CompilerContext) {
            self.events.push(format!("object {}", object_def.name.text));
        }

        fn enter_func(
            &mut self,
            method_def: &ast::FunctionDef,
            _: MethodId,
            _: &MemberContext,
            _: &mut CompilerContext,
        ) {
            self.events.push(format!("def {}", method_def.name.text));
        }

        fn visit_field(
            &mut self,
            field_def: &ast::FieldDef,
            _: FieldId,
            _: &MemberContext,
            _: &mut CompilerContext,
        ) {
            self.events.push(format!("field {}", field_def.name.text));
        }

        fn visit_param(&mut self, parameter: &ast::Parameter, owner: &ParamOwner, _: &mut CompilerContext) {
            let owner = match owner {
                ParamOwner::Class { field: Some(_), .. } => "class field",
                ParamOwner::Class { field: None, .. } => "class",
                ParamOwner::Method(_) => "method",
                ParamOwner::Closure => "closure",
            };
            self.events.push(format!("{} param {}", owner, parameter.name.text));
        }

        fn enter_block(&mut self, _: &ast::BlockExpr, _: &mut CompilerContext) {
            self.events.push("block".to_string());
        }

        fn visit_local(&mut self, local: &ast::LocalDef, _: &mut CompilerContext) {
            self.events.push(format!("local {}", local.name.text));
        }

        fn visit_expr(&mut self, expression: &ast::Expression, _: &mut CompilerContext) {
            if let ast::Expression::IntLiteral(literal) = expression {
                self.events.push(format!("int {}", literal.value));
            }
        }
    }

    #[test]
    fn hooks_follow_declaration_order() {
        let program = parse(tokenize(
            "class A(val x: Int, y: Int = 1) extends B(2) {
                val f = 3
                def g(z: Int): Int = { val w = 4; (v: Int) => 5 }
             }
             trait T { def h: Int }
             object O",
            InputSpanFile::UserProgram,
        ))
        .unwrap();

        let mut sink = DiagnosticSink::new();
        let mut context = CompilerContext::new(&mut sink);
        SymbolCollectionPass::new().run(&[&program], &mut context);

        let mut tracer = Tracer::default();
        tracer.run(&[&program], &mut context);

        assert_eq!(
            tracer.events,
            vec![
                "class A",
                "class field param x",
                "class param y",
                "int 1",
                "int 2",
                "field f",
                "int 3",
                "def g",
                "method param z",
                "block",
                "local w",
                "int 4",
                "closure param v",
                "int 5",
                "trait T",
                "def h",
                "object O",
            ]
        );
    }
}
