//! Front-end of the Sable compiler. Source code is tokenized and parsed, then checked by a
//! sequence of semantic passes that aggregate every problem they find into a diagnostic sink.
//! Only a program free of errors is handed to a backend.

pub mod analyzer;
pub mod ast;
pub mod backends;
pub mod context;
pub mod driver;
pub mod errors;
pub mod options;
pub mod parser;
pub mod source;
pub mod stdlib;
pub mod symbols;

mod utils;

pub use driver::{compile, CompilationStage, Driver};
