//! Backend emitting a textual managed-assembly listing.

mod lowering;
mod printer;

use crate::ast;
use crate::backends::{Backend, BuildArtifact};
use crate::options::BuildOptions;
use crate::symbols::SymbolTable;
use printer::IlPrinter;
use tracing::debug;

pub struct IlBackend;

impl Backend for IlBackend {
    fn generate(
        &self,
        program: &ast::Program,
        symbols: &SymbolTable,
        options: &BuildOptions,
    ) -> BuildArtifact {
        let mut printer = IlPrinter::new();
        printer
            .write_program(program, symbols, options)
            .expect("Error occurred while writing the assembly listing");

        let listing = printer.to_string();
        debug!(bytes = listing.len(), assembly = %options.output_name, "generated assembly listing");

        BuildArtifact {
            name: options.output_name.clone(),
            runtime_library: options.runtime_library.clone(),
            image: listing.into_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IlBackend;
    use crate::ast::Program;
    use crate::backends::Backend;
    use crate::driver::Driver;
    use crate::errors::DiagnosticSink;
    use crate::options::{AnalyzerOptions, BuildOptions};
    use crate::symbols::SymbolTable;

    fn listing(source: &str) -> String {
        let mut sink = DiagnosticSink::new();
        let options = BuildOptions::new("Sable.Runtime", "demo");
        let artifact = Driver::new(AnalyzerOptions::default(), options)
            .with_backend(Box::new(IlBackend))
            .compile(source, &mut sink)
            .unwrap_or_else(|_| panic!("compilation failed: {:?}", sink.diagnostics()));
        String::from_utf8(artifact.image).unwrap()
    }

    #[test]
    fn header_references_runtime() {
        let text = listing("class A");
        assert!(text.starts_with(".assembly extern Sable.Runtime {}\n.assembly demo {}\n"));
    }

    #[test]
    fn class_declarations() {
        let text = listing(
            "trait Shape[+T] { def area: Double }
             abstract class Base(val id: Int) extends AnyRef
             final case class Circle(r: Double) extends Base(1) with Shape[Int] {
                 var scale: Double = 1.0
                 def area: Double = r * r * scale
             }",
        );

        assert!(text.contains(".class public abstract interface Shape<+T>"));
        assert!(text.contains(".method public abstract area(): Double"));
        assert!(text.contains(".class public abstract Base extends [Sable.Runtime]AnyRef"));
        assert!(text.contains(".field public initonly id: Int"));
        assert!(text.contains(
            ".class public final case Circle extends Base implements Shape, [Sable.Runtime]Product, [Sable.Runtime]Serializable"
        ));
        assert!(text.contains(".field public scale: Double"));
        assert!(text.contains("callvirt *(1)"));
    }

    #[test]
    fn constructor_initializes_fields() {
        let text = listing("class P(val x: Int, y: Int) { val z = y + 1 }");
        let expected = [
            ".method public .ctor(x: Int, y: Int) {",
            "  ldarg.0",
            "  call [Sable.Runtime]Any::.ctor(0)",
            "  ldarg.0",
            "  ldarg.1",
            "  stfld x",
            "  ldarg.0",
            "  ldarg.2",
            "  ldc.i8 1",
            "  callvirt +(1)",
            "  stfld z",
            "  ret",
        ]
        .join("\n  ");
        assert!(text.contains(&expected), "unexpected listing:\n{}", text);
    }

    #[test]
    fn control_flow_uses_labels() {
        let text = listing(
            "object Loop {
                def count(n: Int): Int = {
                    var i = 0
                    while (i < n) i = i + 1
                    if (i == n) i else 0
                }
             }",
        );

        assert!(text.contains(".locals (1)"));
        assert!(text.contains("brfalse L1"));
        assert!(text.contains("br L0"));
        assert!(text.contains("stloc.0"));
    }

    #[test]
    fn closures_become_methods() {
        let text = listing(
            "object Fns {
                val inc = (x: Int) => x + 1
                val twice = f => (y: Int) => f(f(y))
             }",
        );

        assert!(text.contains("ldftn <closure>0"));
        assert!(text.contains("newobj [Sable.Runtime]Function1::.ctor(1)"));
        assert!(text.contains(".method private <closure>0(x: Int) {"));
        assert!(text.contains(".method private <closure>1(f) {"));
        assert!(text.contains(".method private <closure>2(y: Int) {"));
    }

    #[test]
    fn artifact_is_named_after_output() {
        let artifact = IlBackend.generate(
            &Program::new(),
            &SymbolTable::new(),
            &BuildOptions::new("Custom.Runtime", "app"),
        );

        assert_eq!(artifact.name, "app");
        assert_eq!(artifact.runtime_library, "Custom.Runtime");
        assert_eq!(
            String::from_utf8(artifact.image).unwrap(),
            ".assembly extern Custom.Runtime {}\n.assembly app {}\n"
        );
    }
}
