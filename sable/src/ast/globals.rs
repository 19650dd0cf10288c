//! AST node definitions for global program structure: class-like definitions and their
//! members, stopping at method bodies and initializers (not including them).

use crate::ast::expressions::Expression;
use crate::ast::modifiers::ModifierList;
use crate::ast::type_expressions::TypeExpr;
use crate::ast::Identifier;
use crate::source::InputSpan;

#[derive(Debug)]
pub struct Program {
    /// Top-level definitions in the order they were written.
    pub definitions: Vec<TypeDef>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            definitions: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    Class,
    Trait,
    Object,
}

impl TypeDefKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeDefKind::Class => "class",
            TypeDefKind::Trait => "trait",
            TypeDefKind::Object => "object",
        }
    }

    pub fn is_class(self) -> bool {
        self == TypeDefKind::Class
    }
}

/// A `class`, `trait` or `object` definition.
#[derive(Debug)]
pub struct TypeDef {
    pub kind: TypeDefKind,
    pub modifiers: ModifierList,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,

    /// Class constructor parameters. Always empty for traits and objects.
    pub parameters: Vec<Parameter>,

    /// Parent types: the one after `extends` first, followed by `with` parents.
    pub parents: Vec<ParentRef>,

    pub members: Vec<Member>,

    /// Covers the modifiers, the keyword and the name.
    pub signature_span: InputSpan,
}

impl TypeDef {
    pub fn is_case(&self) -> bool {
        self.modifiers.contains(crate::ast::Modifiers::CASE)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field_def) => Some(field_def),
            Member::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &FunctionDef> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method_def) => Some(method_def),
            Member::Field(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

impl Variance {
    /// Prefix used for this variance in type parameter lists.
    pub fn sigil(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::Covariant => "+",
            Variance::Contravariant => "-",
        }
    }
}

#[derive(Debug)]
pub struct TypeParameter {
    pub name: Identifier,
    pub variance: Variance,
    pub upper_bound: Option<TypeExpr>,

    pub span: InputSpan,
}

/// A reference to a supertype in an `extends`/`with` clause.
#[derive(Debug)]
pub struct ParentRef {
    pub type_: TypeExpr,

    /// Superclass constructor arguments, e.g. `extends Base(1, 2)`.
    pub arguments: Vec<Expression>,

    pub span: InputSpan,
}

impl ParentRef {
    /// Name of the referenced type, if the reference is a plain (possibly applied) type name.
    pub fn name(&self) -> Option<&Identifier> {
        match &self.type_ {
            TypeExpr::Named(named) => Some(&named.name),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Member {
    Field(FieldDef),
    Method(FunctionDef),
}

/// A `val` or `var` member.
#[derive(Debug)]
pub struct FieldDef {
    pub modifiers: ModifierList,
    pub mutable: bool,
    pub name: Identifier,
    pub type_: Option<TypeExpr>,

    /// The parser stores `Expression::Empty` here when the initializer was omitted.
    pub initializer: Option<Expression>,

    pub span: InputSpan,
}

impl FieldDef {
    /// Whether the field has a real initializer expression.
    pub fn has_initializer(&self) -> bool {
        match &self.initializer {
            Some(initializer) => !initializer.is_empty(),
            None => false,
        }
    }
}

/// A method definition (`def`).
#[derive(Debug)]
pub struct FunctionDef {
    pub modifiers: ModifierList,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,

    /// One entry per parenthesized parameter clause. `def f: Int` has none.
    pub parameter_lists: Vec<Vec<Parameter>>,

    pub return_type: Option<TypeExpr>,

    /// Absent for abstract methods.
    pub body: Option<Expression>,

    pub signature_span: InputSpan,
}

impl FunctionDef {
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameter_lists.iter().flatten()
    }

    /// Total number of parameters across all clauses.
    pub fn arity(&self) -> usize {
        self.parameter_lists.iter().map(Vec::len).sum()
    }

    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Val,
    Var,
}

/// A class, method or closure parameter.
#[derive(Debug)]
pub struct Parameter {
    pub modifiers: ModifierList,

    /// `val`/`var` on class parameters, which turns them into fields.
    pub binding: Option<Binding>,

    pub name: Identifier,

    /// Only closure parameters may omit their type.
    pub type_: Option<TypeExpr>,

    pub default: Option<Expression>,

    pub span: InputSpan,
}
