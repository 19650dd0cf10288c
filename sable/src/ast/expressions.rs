//! Definitions of expression nodes, including blocks and the statements they contain.

use crate::ast::globals::Parameter;
use crate::ast::type_expressions::{NamedTypeExpr, TypeExpr};
use crate::ast::Identifier;
use crate::source::InputSpan;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug)]
pub enum Expression {
    Empty(EmptyExpr),
    IntLiteral(IntLiteralExpr),
    FloatLiteral(FloatLiteralExpr),
    BoolLiteral(BoolLiteralExpr),
    CharLiteral(CharLiteralExpr),
    StringLiteral(StringLiteralExpr),
    Null(NullExpr),
    Unit(UnitExpr),
    This(ThisExpr),
    Variable(VariableExpr),
    Select(SelectExpr),
    Call(CallExpr),
    New(NewExpr),
    UnaryOp(UnaryOperatorExpr),
    BinaryOp(BinaryOperatorExpr),
    Assign(AssignExpr),
    If(IfExpr),
    While(WhileExpr),
    Closure(ClosureExpr),
    Block(BlockExpr),
}

// We don't expose the generated methods of `Expression` to the outside, keeping usage of
// `enum_dispatch` as opaque as possible.
#[enum_dispatch(Expression)]
trait ExpressionKind {
    fn span_(&self) -> InputSpan;
}

macro_rules! impl_expr_kind {
    ($type_name:ty) => {
        impl ExpressionKind for $type_name {
            fn span_(&self) -> InputSpan {
                self.span
            }
        }
    };
}

impl Expression {
    pub fn span(&self) -> InputSpan {
        self.span_()
    }

    /// Whether this is the placeholder the parser produces for an omitted expression.
    pub fn is_empty(&self) -> bool {
        match self {
            Expression::Empty(_) => true,
            _ => false,
        }
    }

    /// Immediate subexpressions, in evaluation order.
    ///
    /// Blocks and closures are not flattened: statements inside a block and closure
    /// parameters are reached through `BlockExpr::statements` and `ClosureExpr::parameters`.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Empty(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::Null(_)
            | Expression::Unit(_)
            | Expression::This(_)
            | Expression::Variable(_)
            | Expression::Block(_) => vec![],
            Expression::Select(select) => vec![&*select.receiver],
            Expression::Call(call) => std::iter::once(&*call.callee)
                .chain(call.arguments.iter())
                .collect(),
            Expression::New(new) => new.arguments.iter().collect(),
            Expression::UnaryOp(unary) => vec![&*unary.operand],
            Expression::BinaryOp(binary) => vec![&*binary.lhs, &*binary.rhs],
            Expression::Assign(assign) => vec![&*assign.target, &*assign.value],
            Expression::If(if_) => {
                let mut children: Vec<&Expression> = vec![&*if_.cond, &*if_.then];
                if let Some(else_) = &if_.else_ {
                    children.push(&**else_);
                }
                children
            }
            Expression::While(while_) => vec![&*while_.cond, &*while_.body],
            Expression::Closure(closure) => vec![&*closure.body],
        }
    }
}

/// Stands in for an omitted expression, e.g. a field declared without an initializer.
#[derive(Debug)]
pub struct EmptyExpr {
    pub span: InputSpan,
}
impl_expr_kind!(EmptyExpr);

#[derive(Debug)]
pub struct IntLiteralExpr {
    pub value: i64,

    pub span: InputSpan,
}
impl_expr_kind!(IntLiteralExpr);

#[derive(Debug)]
pub struct FloatLiteralExpr {
    pub value: f64,

    pub span: InputSpan,
}
impl_expr_kind!(FloatLiteralExpr);

#[derive(Debug)]
pub struct BoolLiteralExpr {
    pub value: bool,

    pub span: InputSpan,
}
impl_expr_kind!(BoolLiteralExpr);

#[derive(Debug)]
pub struct CharLiteralExpr {
    pub value: char,

    pub span: InputSpan,
}
impl_expr_kind!(CharLiteralExpr);

#[derive(Debug)]
pub struct StringLiteralExpr {
    pub value: String,

    pub span: InputSpan,
}
impl_expr_kind!(StringLiteralExpr);

#[derive(Debug)]
pub struct NullExpr {
    pub span: InputSpan,
}
impl_expr_kind!(NullExpr);

/// `()`.
#[derive(Debug)]
pub struct UnitExpr {
    pub span: InputSpan,
}
impl_expr_kind!(UnitExpr);

#[derive(Debug)]
pub struct ThisExpr {
    pub span: InputSpan,
}
impl_expr_kind!(ThisExpr);

#[derive(Debug)]
pub struct VariableExpr {
    pub name: Identifier,

    pub span: InputSpan,
}
impl_expr_kind!(VariableExpr);

/// Member selection: `receiver.name`.
#[derive(Debug)]
pub struct SelectExpr {
    pub receiver: Box<Expression>,
    pub name: Identifier,

    pub span: InputSpan,
}
impl_expr_kind!(SelectExpr);

#[derive(Debug)]
pub struct CallExpr {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(CallExpr);

#[derive(Debug)]
pub struct NewExpr {
    pub type_: NamedTypeExpr,
    pub arguments: Vec<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(NewExpr);

/// Prefix operator application. Operators are ordinary methods: `-x` means `x.unary_-`.
#[derive(Debug)]
pub struct UnaryOperatorExpr {
    pub operator: Identifier,
    pub operand: Box<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(UnaryOperatorExpr);

/// Infix operator application. Operators are ordinary methods: `a + b` means `a.+(b)`.
#[derive(Debug)]
pub struct BinaryOperatorExpr {
    pub operator: Identifier,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(BinaryOperatorExpr);

#[derive(Debug)]
pub struct AssignExpr {
    pub target: Box<Expression>,
    pub value: Box<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(AssignExpr);

#[derive(Debug)]
pub struct IfExpr {
    pub cond: Box<Expression>,
    pub then: Box<Expression>,
    pub else_: Option<Box<Expression>>,

    pub span: InputSpan,
}
impl_expr_kind!(IfExpr);

#[derive(Debug)]
pub struct WhileExpr {
    pub cond: Box<Expression>,
    pub body: Box<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(WhileExpr);

/// Anonymous function: `(x: Int) => x + 1`.
#[derive(Debug)]
pub struct ClosureExpr {
    pub parameters: Vec<Parameter>,
    pub body: Box<Expression>,

    pub span: InputSpan,
}
impl_expr_kind!(ClosureExpr);

#[derive(Debug)]
pub struct BlockExpr {
    pub statements: Vec<Statement>,

    pub span: InputSpan,
}
impl_expr_kind!(BlockExpr);

#[derive(Debug)]
pub enum Statement {
    Local(LocalDef),
    Expr(Expression),
}

/// A local `val`/`var` inside a block.
#[derive(Debug)]
pub struct LocalDef {
    pub mutable: bool,
    pub name: Identifier,
    pub type_: Option<TypeExpr>,
    pub initializer: Expression,

    pub span: InputSpan,
}
