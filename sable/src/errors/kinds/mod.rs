mod e0001_syntax_error;
mod e0002_duplicate_declaration;
mod e0003_unresolved_supertype;
mod e0004_missing_initializer;
mod e0005_unimplemented_abstract_member;
mod e0006_abstract_method_in_concrete_class;
mod e0007_cyclic_inheritance;
mod w0001_redundant_abstract_modifier;

pub mod constructors {
    pub use super::e0001_syntax_error::*;
    pub use super::e0002_duplicate_declaration::*;
    pub use super::e0003_unresolved_supertype::*;
    pub use super::e0004_missing_initializer::*;
    pub use super::e0005_unimplemented_abstract_member::*;
    pub use super::e0006_abstract_method_in_concrete_class::*;
    pub use super::e0007_cyclic_inheritance::*;
    pub use super::w0001_redundant_abstract_modifier::*;
}
