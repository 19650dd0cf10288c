//! Syntax nodes for type expressions.

use crate::ast::Identifier;
use crate::source::InputSpan;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// `Int`, `List[Int]`.
    Named(NamedTypeExpr),

    /// `(A, B) => C`, `A => B`.
    Function(FunctionTypeExpr),

    /// `(A, B)`.
    Tuple(TupleTypeExpr),
}

#[derive(Debug, Clone)]
pub struct NamedTypeExpr {
    pub name: Identifier,
    pub arguments: Vec<TypeExpr>,

    pub span: InputSpan,
}

#[derive(Debug, Clone)]
pub struct FunctionTypeExpr {
    pub parameters: Vec<TypeExpr>,
    pub result: Box<TypeExpr>,

    pub span: InputSpan,
}

#[derive(Debug, Clone)]
pub struct TupleTypeExpr {
    pub elements: Vec<TypeExpr>,

    pub span: InputSpan,
}

impl TypeExpr {
    pub fn span(&self) -> InputSpan {
        match self {
            TypeExpr::Named(type_expr) => type_expr.span,
            TypeExpr::Function(type_expr) => type_expr.span,
            TypeExpr::Tuple(type_expr) => type_expr.span,
        }
    }
}

fn write_list(f: &mut Formatter<'_>, types: &[TypeExpr]) -> fmt::Result {
    for (index, type_) in types.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", type_)?;
    }
    Ok(())
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(named) => {
                write!(f, "{}", named.name.text)?;
                if !named.arguments.is_empty() {
                    write!(f, "[")?;
                    write_list(f, &named.arguments)?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TypeExpr::Function(function) => {
                write!(f, "(")?;
                write_list(f, &function.parameters)?;
                write!(f, ") => {}", function.result)
            }
            TypeExpr::Tuple(tuple) => {
                write!(f, "(")?;
                write_list(f, &tuple.elements)?;
                write!(f, ")")
            }
        }
    }
}
