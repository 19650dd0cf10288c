//! Backends for the Sable compiler. A backend receives the program after all analysis passes
//! succeeded, and turns it into a build artifact.

pub mod il;

use crate::ast;
use crate::options::BuildOptions;
use crate::symbols::SymbolTable;

/// Output of a backend: an in-memory image of the compiled assembly.
#[derive(Clone, Debug)]
pub struct BuildArtifact {
    /// Name of the assembly.
    pub name: String,

    /// Runtime library the assembly links against.
    pub runtime_library: String,

    pub image: Vec<u8>,
}

/// Common backend interface.
pub trait Backend {
    /// Generates code for a validated program. Backends may panic on internal errors, but
    /// are never given a program with user-caused errors.
    fn generate(
        &self,
        program: &ast::Program,
        symbols: &SymbolTable,
        options: &BuildOptions,
    ) -> BuildArtifact;
}
