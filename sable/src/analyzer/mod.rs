//! Semantic analysis passes.
//!
//! Analysis is done in multiple _passes_, each of them a visitor over the AST of every
//! compilation unit. Passes run strictly in sequence, each one relying on what the previous
//! ones recorded in the symbol table:
//!
//! 1. `declarations`: every class, trait, object and member gets a descriptor.
//! 2. `supertypes`: parent references are resolved and inheritance cycles are broken.
//! 3. `structure`: local, per-declaration checks (Stage 1).
//! 4. `obligations`: checks of abstract members along supertype chains (Stage 2).
//!
//! No pass ever stops because of a problem it found: problems are reported to the diagnostic
//! sink, and the driver decides whether compilation may proceed after the last pass.

pub mod declarations;
pub mod obligations;
pub mod structure;
pub mod supertypes;

mod visitor;

pub use visitor::{traverse, traverse_expression, AstVisitor, MemberContext, ParamOwner};

#[cfg(test)]
pub(crate) mod testing {
    use crate::analyzer::AstVisitor;
    use crate::ast;
    use crate::context::CompilerContext;
    use crate::errors::{Diagnostic, DiagnosticSink};
    use crate::parser::{parse, tokenize};
    use crate::source::InputSpanFile;
    use crate::stdlib;
    use crate::symbols::SymbolTable;

    /// Runs `passes` in order over `source`, compiled together with the prelude.
    pub fn run_passes(source: &str, passes: &mut [&mut dyn AstVisitor]) -> Vec<Diagnostic> {
        analyze(source, true, passes).0
    }

    /// Like `run_passes`, but also returns the resulting symbol table. Without `prelude`, the
    /// root type is the only predeclared one.
    pub fn analyze(
        source: &str,
        prelude: bool,
        passes: &mut [&mut dyn AstVisitor],
    ) -> (Vec<Diagnostic>, SymbolTable) {
        let mut units = Vec::new();
        if prelude {
            units.push(parse_unit(stdlib::PRELUDE_SOURCE, InputSpanFile::Prelude));
        }
        units.push(parse_unit(source, InputSpanFile::UserProgram));
        let units: Vec<&ast::Program> = units.iter().collect();

        let mut sink = DiagnosticSink::new();
        let mut context = CompilerContext::new(&mut sink);
        for pass in passes.iter_mut() {
            pass.run(&units, &mut context);
        }

        let symbols = context.symbols;
        (sink.diagnostics().to_vec(), symbols)
    }

    fn parse_unit(source: &str, file: InputSpanFile) -> ast::Program {
        match parse(tokenize(source, file)) {
            Ok(program) => program,
            Err(errors) => panic!("unexpected syntax errors: {:?}", errors),
        }
    }
}
