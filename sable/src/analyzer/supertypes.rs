//! In this pass, parent references of every type are resolved, and inheritance cycles are
//! detected and broken, so that supertype chains are well-defined for all later passes.

use crate::analyzer::AstVisitor;
use crate::ast;
use crate::context::CompilerContext;
use crate::errors;
use crate::source::InputSpan;
use crate::symbols::ClassId;
use crate::utils::graphs::find_cycles;
use petgraph::graph::{node_index, DiGraph};
use tracing::debug;

/// Marker traits mixed into every `case class`.
const CASE_CLASS_TRAITS: [&str; 2] = ["Product", "Serializable"];

/// A resolved parent reference.
struct InheritanceEdge {
    class: ClassId,
    parent: ClassId,
    span: InputSpan,
}

pub struct SupertypeResolutionPass {
    edges: Vec<InheritanceEdge>,
}

impl SupertypeResolutionPass {
    pub fn new() -> SupertypeResolutionPass {
        SupertypeResolutionPass { edges: Vec::new() }
    }

    fn resolve_parents(&mut self, type_def: &ast::TypeDef, context: &mut CompilerContext) {
        let class = context.globals.class(type_def);
        let mut superclass = None;
        let mut traits = Vec::new();

        for (index, parent) in type_def.parents.iter().enumerate() {
            let name = match parent.name() {
                Some(name) => name,
                None => continue,
            };

            let parent_id = match context.symbols.lookup_class(&name.text) {
                Some(parent_id) => parent_id,
                None => {
                    context.diagnostics.push(errors::unresolved_supertype(
                        &name.text,
                        &type_def.name.text,
                        name.span,
                    ));
                    continue;
                }
            };

            // Only the `extends` parent can be the superclass, and only if it is not a trait.
            if index == 0 && !context.symbols.class(parent_id).is_trait() {
                superclass = Some(parent_id);
            } else {
                traits.push(parent_id);
            }
            self.edges.push(InheritanceEdge {
                class,
                parent: parent_id,
                span: name.span,
            });
        }

        if type_def.is_case() {
            for name in CASE_CLASS_TRAITS.iter() {
                if let Some(marker) = context.symbols.lookup_class(name) {
                    if !traits.contains(&marker) {
                        traits.push(marker);
                        self.edges.push(InheritanceEdge {
                            class,
                            parent: marker,
                            span: type_def.signature_span,
                        });
                    }
                }
            }
        }

        let descriptor = context.symbols.class_mut(class);
        descriptor.superclass = superclass;
        descriptor.traits = traits;
    }

    /// Reports every inheritance cycle and removes the edges forming it, until the hierarchy
    /// is acyclic.
    fn break_cycles(&mut self, context: &mut CompilerContext) {
        loop {
            let mut graph: DiGraph<ClassId, InputSpan> = DiGraph::new();
            for class in context.symbols.class_ids() {
                graph.add_node(class);
            }
            for edge in &self.edges {
                graph.add_edge(
                    node_index(edge.class.index()),
                    node_index(edge.parent.index()),
                    edge.span,
                );
            }

            let cycles = find_cycles(&graph);
            if cycles.is_empty() {
                return;
            }

            for cycle in cycles {
                let classes: Vec<ClassId> = cycle.iter().map(|node| graph[*node]).collect();
                let links: Vec<(ClassId, ClassId)> = (0..classes.len())
                    .map(|index| (classes[index], classes[(index + 1) % classes.len()]))
                    .collect();

                let described: Vec<(String, InputSpan)> = links
                    .iter()
                    .map(|(class, parent)| {
                        (context.symbols.class(*class).name.clone(), self.edge_span(*class, *parent))
                    })
                    .collect();
                debug!(length = described.len(), "breaking inheritance cycle");
                context.diagnostics.push(errors::cyclic_inheritance(&described));

                for (class, parent) in links {
                    context.symbols.remove_supertype(class, parent);
                    self.edges
                        .retain(|edge| !(edge.class == class && edge.parent == parent));
                }
            }
        }
    }

    fn edge_span(&self, class: ClassId, parent: ClassId) -> InputSpan {
        self.edges
            .iter()
            .find(|edge| edge.class == class && edge.parent == parent)
            .map(|edge| edge.span)
            .unwrap_or_else(|| panic!("No inheritance edge between classes {:?} and {:?}", class, parent))
    }
}

impl AstVisitor for SupertypeResolutionPass {
    fn run(&mut self, units: &[&ast::Program], context: &mut CompilerContext) {
        for unit in units {
            for type_def in &unit.definitions {
                self.resolve_parents(type_def, context);
            }
        }

        self.break_cycles(context);
    }
}

#[cfg(test)]
mod tests {
    use super::SupertypeResolutionPass;
    use crate::analyzer::declarations::SymbolCollectionPass;
    use crate::analyzer::testing::{analyze, run_passes};
    use crate::errors::{Diagnostic, DiagnosticKind};

    fn resolve(source: &str) -> Vec<Diagnostic> {
        run_passes(
            source,
            &mut [
                &mut SymbolCollectionPass::new(),
                &mut SupertypeResolutionPass::new(),
            ],
        )
    }

    #[test]
    fn resolves_known_parents() {
        assert!(resolve(
            "trait Named
             abstract class Base
             class A extends Base with Named
             class B extends Named
             case class C(x: Int) extends A"
        )
        .is_empty());
    }

    #[test]
    fn unknown_parent_is_reported_and_dropped() {
        let diagnostics = resolve("class A extends Missing with AlsoMissing");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "cannot find type `Missing` to inherit from",
                "cannot find type `AlsoMissing` to inherit from",
            ]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::UnresolvedSupertype));
    }

    #[test]
    fn cycles_are_reported_once() {
        let diagnostics = resolve(
            "class A extends B
             class B extends C
             class C extends A
             class D extends D
             class E extends A",
        );

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::CyclicInheritance));
        assert_eq!(
            diagnostics[0].free_notes[0],
            "inheritance path: `A` -> `B` -> `C` -> `A`"
        );
        assert_eq!(diagnostics[0].location.line, 1);
        assert_eq!(diagnostics[0].bound_notes.len(), 2);
        assert_eq!(
            diagnostics[1].free_notes[0],
            "inheritance path: `D` -> `D`"
        );
    }

    #[test]
    fn overlapping_cycles_are_all_broken() {
        let diagnostics = resolve(
            "trait A extends B
             trait B extends A with C
             trait C extends B",
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn case_class_marker_edges_take_part_in_cycles() {
        let (diagnostics, symbols) = analyze(
            "trait Product extends C
             case class C",
            false,
            &mut [
                &mut SymbolCollectionPass::new(),
                &mut SupertypeResolutionPass::new(),
            ],
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::CyclicInheritance);
        assert_eq!(
            diagnostics[0].free_notes[0],
            "inheritance path: `Product` -> `C` -> `Product`"
        );

        let c = symbols.lookup_class("C").unwrap();
        assert!(symbols.class(c).traits.is_empty());
        assert_eq!(symbols.resolve_supertype_chain(c).len(), 2);
    }
}
