//! Abstract syntax tree representation. This is the interface between the parser and the
//! semantic passes.
//!
//! The tree is created once by the parser and never restructured afterwards: passes only
//! read it, attaching their findings to the symbol table and the diagnostic sink.

use crate::source::InputSpan;

mod expressions;
mod globals;
mod modifiers;
mod type_expressions;

#[derive(Debug, Clone)]
pub struct Identifier {
    pub text: String,

    pub span: InputSpan,
}

pub use expressions::*;
pub use globals::*;
pub use modifiers::*;
pub use type_expressions::*;
