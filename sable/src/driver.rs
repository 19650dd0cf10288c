//! The compilation driver: runs the whole pipeline over one source text.

use crate::analyzer::declarations::SymbolCollectionPass;
use crate::analyzer::obligations::InheritanceObligationPass;
use crate::analyzer::structure::StructuralValidationPass;
use crate::analyzer::supertypes::SupertypeResolutionPass;
use crate::analyzer::AstVisitor;
use crate::ast;
use crate::backends::il::IlBackend;
use crate::backends::{Backend, BuildArtifact};
use crate::context::CompilerContext;
use crate::errors::{self, DiagnosticSink};
use crate::options::{AnalyzerOptions, BuildOptions};
use crate::parser::{parse, tokenize};
use crate::source::InputSpanFile;
use crate::stdlib;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompilationStage {
    Init,
    Lexed,
    Parsed,
    SymbolsBuilt,
    StructureValidated,
    ObligationsValidated,
    Generated,
    Aborted,
}

pub struct Driver {
    analyzer_options: AnalyzerOptions,
    build_options: BuildOptions,
    backend: Box<dyn Backend>,
    stage: CompilationStage,
}

impl Driver {
    /// Creates a driver generating code with the IL backend.
    pub fn new(analyzer_options: AnalyzerOptions, build_options: BuildOptions) -> Driver {
        Driver {
            analyzer_options,
            build_options,
            backend: Box::new(IlBackend),
            stage: CompilationStage::Init,
        }
    }

    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Driver {
        self.backend = backend;
        self
    }

    /// Stage reached by the last compilation.
    pub fn stage(&self) -> CompilationStage {
        self.stage
    }

    /// Compiles `source` as the user program.
    ///
    /// All problems found are recorded in `sink`, which is cleared first: it only ever holds
    /// the diagnostics of the latest compilation. Compilation produces an artifact only if
    /// no errors were found; otherwise the sink is flushed and `Err` is returned.
    pub fn compile(
        &mut self,
        source: &str,
        sink: &mut DiagnosticSink,
    ) -> Result<BuildArtifact, ()> {
        self.stage = CompilationStage::Init;
        sink.clear();

        let mut token_streams = Vec::new();
        if !self.analyzer_options.no_prelude {
            token_streams.push(tokenize(stdlib::PRELUDE_SOURCE, InputSpanFile::Prelude));
        }
        token_streams.push(tokenize(source, InputSpanFile::UserProgram));
        self.advance(CompilationStage::Lexed);

        let mut units = Vec::new();
        let mut syntax_errors = 0;
        for tokens in token_streams {
            match parse(tokens) {
                Ok(program) => units.push(program),
                Err(errors) => {
                    syntax_errors += errors.len();
                    for error in &errors {
                        sink.push(errors::syntax_error(error));
                    }
                }
            }
        }
        self.advance(CompilationStage::Parsed);

        if syntax_errors > 0 {
            debug!(count = syntax_errors, "syntax errors found, skipping analysis");
            return self.abort(sink);
        }

        let units: Vec<&ast::Program> = units.iter().collect();
        let symbols = {
            let mut context = CompilerContext::new(sink);

            SymbolCollectionPass::new().run(&units, &mut context);
            SupertypeResolutionPass::new().run(&units, &mut context);
            self.advance(CompilationStage::SymbolsBuilt);

            StructuralValidationPass::new().run(&units, &mut context);
            self.advance(CompilationStage::StructureValidated);

            InheritanceObligationPass::new().run(&units, &mut context);
            self.advance(CompilationStage::ObligationsValidated);

            context.symbols
        };

        if sink.has_error() {
            return self.abort(sink);
        }

        let user_program = units
            .last()
            .expect("User program was not parsed in previous stages");
        let artifact = self
            .backend
            .generate(user_program, &symbols, &self.build_options);
        self.advance(CompilationStage::Generated);

        if !sink.diagnostics().is_empty() {
            sink.flush();
        }
        info!(
            assembly = %artifact.name,
            warnings = sink.warning_count(),
            "compilation succeeded"
        );
        Ok(artifact)
    }

    fn advance(&mut self, stage: CompilationStage) {
        debug!(from = ?self.stage, to = ?stage, "compilation stage transition");
        self.stage = stage;
    }

    fn abort(&mut self, sink: &mut DiagnosticSink) -> Result<BuildArtifact, ()> {
        self.advance(CompilationStage::Aborted);
        warn!(
            errors = sink.error_count(),
            warnings = sink.warning_count(),
            "compilation aborted"
        );
        sink.flush();
        Err(())
    }
}

/// Compiles `source` with default analyzer options and the IL backend.
pub fn compile(
    source: &str,
    runtime_library: &str,
    output_name: &str,
    sink: &mut DiagnosticSink,
) -> Result<BuildArtifact, ()> {
    Driver::new(
        AnalyzerOptions::default(),
        BuildOptions::new(runtime_library, output_name),
    )
    .compile(source, sink)
}

#[cfg(test)]
mod tests {
    use super::{compile, CompilationStage, Driver};
    use crate::ast;
    use crate::backends::{Backend, BuildArtifact};
    use crate::errors::{Diagnostic, DiagnosticKind, DiagnosticSink, Reporter};
    use crate::options::{AnalyzerOptions, BuildOptions};
    use crate::symbols::SymbolTable;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn compile_source(source: &str) -> (Result<BuildArtifact, ()>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let result = compile(source, "Sable.Runtime", "test", &mut sink);
        (result, sink)
    }

    fn kinds(sink: &DiagnosticSink) -> Vec<DiagnosticKind> {
        sink.diagnostics().iter().map(|d| d.kind).collect()
    }

    #[test]
    fn missing_initializer_blocks_generation() {
        let (result, sink) = compile_source("class C { val x: Int }");

        assert!(result.is_err());
        assert_eq!(kinds(&sink), vec![DiagnosticKind::MissingInitializer]);
        let position = sink.diagnostics()[0].position();
        assert_eq!((position.line, position.column), (1, 15));
    }

    #[test]
    fn constructor_parameters_are_exempt() {
        let (result, sink) = compile_source("class C(val x: Int)");

        assert!(result.is_ok());
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unimplemented_abstract_member() {
        let (result, sink) = compile_source(
            "abstract class A { def f: Int }
             class B extends A {}",
        );

        assert!(result.is_err());
        assert_eq!(kinds(&sink), vec![DiagnosticKind::UnimplementedAbstractMember]);
        assert!(sink.diagnostics()[0].message.contains("`f`"));
    }

    #[test]
    fn abstract_method_in_concrete_class() {
        let (result, sink) = compile_source(
            "class A { def f: Int }
             class D { val y: Int }",
        );

        assert!(result.is_err());
        assert_eq!(
            kinds(&sink),
            vec![
                DiagnosticKind::MissingInitializer,
                DiagnosticKind::AbstractMethodInConcreteClass,
            ]
        );
    }

    #[test]
    fn aggregates_independent_errors() {
        let (result, sink) = compile_source(
            "trait Shape { def area: Double }
             class Square extends Shape { val side: Double }
             class Circle { val radius: Double; def area: Double }
             object Registry { var shapes: Int }
             class Triangle extends Shape",
        );

        assert!(result.is_err());
        assert_eq!(sink.error_count(), 6);
        assert_eq!(sink.of_kind(DiagnosticKind::MissingInitializer).count(), 3);
        assert_eq!(sink.of_kind(DiagnosticKind::UnimplementedAbstractMember).count(), 2);
        assert_eq!(sink.of_kind(DiagnosticKind::AbstractMethodInConcreteClass).count(), 1);
    }

    #[test]
    fn clean_program_generates_artifact() {
        let (result, sink) = compile_source(
            "abstract class Animal(val name: String) { def sound: String }
             class Dog(name: String) extends Animal(name) { def sound: String = \"woof\" }
             object Main { val pet = new Dog(\"Rex\") }",
        );

        assert!(sink.diagnostics().is_empty());
        let artifact = result.unwrap();
        assert_eq!(artifact.name, "test");
        assert!(!artifact.image.is_empty());
    }

    #[test]
    fn warnings_do_not_block_generation() {
        let (result, sink) = compile_source("abstract trait T");

        assert!(result.is_ok());
        assert_eq!(kinds(&sink), vec![DiagnosticKind::RedundantAbstractModifier]);
    }

    #[test]
    fn syntax_errors_abort_after_parsing() {
        let mut sink = DiagnosticSink::new();
        let mut driver = Driver::new(AnalyzerOptions::default(), BuildOptions::default());

        assert!(driver.compile("class C { val x: Int }\nclass ( D", &mut sink).is_err());
        assert_eq!(driver.stage(), CompilationStage::Aborted);
        assert_eq!(kinds(&sink), vec![DiagnosticKind::SyntaxError]);
    }

    #[test]
    fn stage_after_success() {
        let mut sink = DiagnosticSink::new();
        let mut driver = Driver::new(AnalyzerOptions::default(), BuildOptions::default());
        assert_eq!(driver.stage(), CompilationStage::Init);

        assert!(driver.compile("class C", &mut sink).is_ok());
        assert_eq!(driver.stage(), CompilationStage::Generated);

        assert!(driver.compile("class C { def f: Int }", &mut sink).is_err());
        assert_eq!(driver.stage(), CompilationStage::Aborted);
    }

    #[test]
    fn without_prelude_only_root_is_known() {
        let mut sink = DiagnosticSink::new();
        let mut driver = Driver::new(AnalyzerOptions { no_prelude: true }, BuildOptions::default());

        assert!(driver.compile("class C extends AnyRef", &mut sink).is_err());
        assert_eq!(kinds(&sink), vec![DiagnosticKind::UnresolvedSupertype]);

        let mut sink = DiagnosticSink::new();
        assert!(driver.compile("class C extends Any", &mut sink).is_ok());
    }

    struct FlushCounter(Rc<Cell<usize>>);

    impl Reporter for FlushCounter {
        fn render(&mut self, _: &[Diagnostic]) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn abort_flushes_sink() {
        let flushes = Rc::new(Cell::new(0));
        let mut sink = DiagnosticSink::with_reporter(Box::new(FlushCounter(flushes.clone())));

        assert!(compile("class C { val x: Int }", "R", "out", &mut sink).is_err());
        assert_eq!(flushes.get(), 1);
    }

    #[test]
    fn errors_of_previous_compilation_are_not_kept() {
        let flushes = Rc::new(Cell::new(0));
        let mut sink = DiagnosticSink::with_reporter(Box::new(FlushCounter(flushes.clone())));
        let mut driver = Driver::new(AnalyzerOptions::default(), BuildOptions::default());

        assert!(driver.compile("class C { val x: Int }", &mut sink).is_err());
        assert_eq!(sink.error_count(), 1);
        assert_eq!(flushes.get(), 1);

        assert!(driver.compile("class D", &mut sink).is_ok());
        assert_eq!(driver.stage(), CompilationStage::Generated);
        assert!(sink.diagnostics().is_empty());
        assert_eq!(flushes.get(), 1);
    }

    #[test]
    fn duplicate_declaration_is_still_checked() {
        let (result, sink) = compile_source(
            "class A
             class A { val x: Int; def g: Int }",
        );

        assert!(result.is_err());
        assert_eq!(
            kinds(&sink),
            vec![
                DiagnosticKind::DuplicateDeclaration,
                DiagnosticKind::MissingInitializer,
                DiagnosticKind::AbstractMethodInConcreteClass,
            ]
        );
    }

    struct RecordingBackend(Rc<RefCell<Vec<String>>>);

    impl Backend for RecordingBackend {
        fn generate(
            &self,
            program: &ast::Program,
            symbols: &SymbolTable,
            options: &BuildOptions,
        ) -> BuildArtifact {
            for type_def in &program.definitions {
                assert!(symbols.lookup_class(&type_def.name.text).is_some());
                self.0.borrow_mut().push(type_def.name.text.clone());
            }
            BuildArtifact {
                name: options.output_name.clone(),
                runtime_library: options.runtime_library.clone(),
                image: vec![1],
            }
        }
    }

    #[test]
    fn backend_receives_only_user_program() {
        let generated = Rc::new(RefCell::new(Vec::new()));
        let mut sink = DiagnosticSink::new();
        let mut driver = Driver::new(AnalyzerOptions::default(), BuildOptions::default())
            .with_backend(Box::new(RecordingBackend(generated.clone())));

        assert!(driver.compile("class A\nobject B", &mut sink).is_ok());
        assert_eq!(*generated.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn backend_is_not_invoked_on_errors() {
        let generated = Rc::new(RefCell::new(Vec::new()));
        let mut sink = DiagnosticSink::new();
        let mut driver = Driver::new(AnalyzerOptions::default(), BuildOptions::default())
            .with_backend(Box::new(RecordingBackend(generated.clone())));

        assert!(driver.compile("class A { def f: Int }", &mut sink).is_err());
        assert!(generated.borrow().is_empty());
    }
}
