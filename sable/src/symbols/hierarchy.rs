//! Queries over the inheritance hierarchy.

use crate::symbols::{ClassId, MethodDescriptor, MethodId, Signature, SymbolTable};
use std::collections::HashSet;

impl SymbolTable {
    /// Linearized supertypes of a class: the class itself, then each trait parent's chain in
    /// declaration order, then the superclass chain. Every type appears once, at its first
    /// position, and the root type comes last.
    ///
    /// This is the order in which implementations are looked up.
    pub fn resolve_supertype_chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        self.linearize(id, &mut chain);
        chain.push(ClassId::ROOT);
        chain
    }

    fn linearize(&self, id: ClassId, chain: &mut Vec<ClassId>) {
        // The `contains` check also keeps this total on hierarchies that still have cycles.
        if id == ClassId::ROOT || chain.contains(&id) {
            return;
        }
        chain.push(id);

        let class = self.class(id);
        for trait_ in &class.traits {
            self.linearize(*trait_, chain);
        }
        if let Some(superclass) = class.superclass {
            self.linearize(superclass, chain);
        }
    }

    /// Abstract methods a class still has to implement: signatures declared abstract somewhere
    /// in the supertype chain, and declared concrete nowhere in it.
    ///
    /// Ordered by first abstract declaration in chain order, one method per signature.
    pub fn abstract_members_of(&self, id: ClassId) -> Vec<MethodId> {
        let chain = self.resolve_supertype_chain(id);

        let implemented: HashSet<Signature> = self
            .chain_methods(&chain)
            .filter(|(_, method)| !method.is_abstract)
            .map(|(_, method)| method.signature())
            .collect();

        let mut reported = HashSet::new();
        self.chain_methods(&chain)
            .filter(|(_, method)| method.is_abstract)
            .filter(|(_, method)| {
                let signature = method.signature();
                !implemented.contains(&signature) && reported.insert(signature)
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn chain_methods<'a>(
        &'a self,
        chain: &'a [ClassId],
    ) -> impl Iterator<Item = (MethodId, &'a MethodDescriptor)> + 'a {
        chain
            .iter()
            .flat_map(move |class| self.class(*class).methods())
            .map(move |method| (method, self.method(method)))
    }

    /// The concrete method that implements `signature` for a class: the first one found in
    /// supertype chain order.
    pub fn find_implementation(&self, id: ClassId, signature: &Signature) -> Option<MethodId> {
        self.resolve_supertype_chain(id)
            .into_iter()
            .flat_map(|class| self.class(class).methods())
            .find(|method| {
                let method = self.method(*method);
                !method.is_abstract && method.signature() == *signature
            })
    }

    /// Whether `ancestor` appears in the supertype chain of `id`.
    pub fn is_subtype_of(&self, id: ClassId, ancestor: ClassId) -> bool {
        self.resolve_supertype_chain(id).contains(&ancestor)
    }

    /// Resolved parents of a class: the superclass, if any, followed by its traits.
    pub fn direct_supertypes(&self, id: ClassId) -> Vec<ClassId> {
        let class = self.class(id);
        class
            .superclass
            .iter()
            .chain(class.traits.iter())
            .copied()
            .collect()
    }

    /// Drops the resolved inheritance edge from `id` to `parent`.
    pub fn remove_supertype(&mut self, id: ClassId, parent: ClassId) {
        let class = self.class_mut(id);
        if class.superclass == Some(parent) {
            class.superclass = None;
        }
        class.traits.retain(|trait_| *trait_ != parent);
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Modifiers, TypeDefKind};
    use crate::errors::DiagnosticSink;
    use crate::symbols::tests::{class, method};
    use crate::symbols::{ClassId, Signature, SymbolTable};

    struct Fixture {
        table: SymbolTable,
        sink: DiagnosticSink,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                table: SymbolTable::new(),
                sink: DiagnosticSink::new(),
            }
        }

        fn declare(&mut self, name: &str, kind: TypeDefKind, modifiers: Modifiers) -> ClassId {
            let line = self.table.class_ids().count() as u32;
            self.table
                .declare_class(class(name, kind, modifiers, line), &mut self.sink)
        }

        fn inherit(&mut self, id: ClassId, superclass: Option<ClassId>, traits: Vec<ClassId>) {
            let class = self.table.class_mut(id);
            class.superclass = superclass;
            class.traits = traits;
        }

        fn method(&mut self, owner: ClassId, name: &str, arity: usize, is_abstract: bool) {
            self.table
                .declare_method(method(name, arity, is_abstract, owner, 1), &mut self.sink);
        }

        fn names(&self, ids: &[ClassId]) -> Vec<String> {
            ids.iter().map(|id| self.table.class(*id).name.clone()).collect()
        }
    }

    #[test]
    fn chain_order_is_self_traits_superclass_root() {
        let mut f = Fixture::new();
        let s = f.declare("S", TypeDefKind::Class, Modifiers::empty());
        let t1 = f.declare("T1", TypeDefKind::Trait, Modifiers::empty());
        let t2 = f.declare("T2", TypeDefKind::Trait, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(c, Some(s), vec![t1, t2]);

        let chain = f.table.resolve_supertype_chain(c);
        assert_eq!(f.names(&chain), vec!["C", "T1", "T2", "S", "Any"]);
        assert_eq!(f.table.resolve_supertype_chain(c), chain);
    }

    #[test]
    fn shared_ancestors_appear_once() {
        let mut f = Fixture::new();
        let base = f.declare("Base", TypeDefKind::Trait, Modifiers::empty());
        let left = f.declare("Left", TypeDefKind::Trait, Modifiers::empty());
        let right = f.declare("Right", TypeDefKind::Trait, Modifiers::empty());
        let s = f.declare("S", TypeDefKind::Class, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(left, None, vec![base]);
        f.inherit(right, None, vec![base]);
        f.inherit(s, None, vec![base]);
        f.inherit(c, Some(s), vec![left, right]);

        let chain = f.table.resolve_supertype_chain(c);
        assert_eq!(f.names(&chain), vec!["C", "Left", "Base", "Right", "S", "Any"]);
        assert!(f.table.is_subtype_of(c, base));
        assert!(!f.table.is_subtype_of(base, c));
    }

    #[test]
    fn chain_survives_cycles() {
        let mut f = Fixture::new();
        let a = f.declare("A", TypeDefKind::Class, Modifiers::empty());
        let b = f.declare("B", TypeDefKind::Class, Modifiers::empty());
        f.inherit(a, Some(b), vec![]);
        f.inherit(b, Some(a), vec![]);

        assert_eq!(f.names(&f.table.resolve_supertype_chain(a)), vec!["A", "B", "Any"]);
    }

    #[test]
    fn abstract_members_exclude_implemented_signatures() {
        let mut f = Fixture::new();
        let a = f.declare("A", TypeDefKind::Class, Modifiers::ABSTRACT);
        let t = f.declare("T", TypeDefKind::Trait, Modifiers::empty());
        let b = f.declare("B", TypeDefKind::Class, Modifiers::empty());
        f.inherit(b, Some(a), vec![t]);

        f.method(a, "f", 0, true);
        f.method(a, "g", 1, true);
        f.method(a, "h", 0, true);
        f.method(t, "g", 1, false);
        f.method(t, "h", 1, false);

        let outstanding: Vec<String> = f
            .table
            .abstract_members_of(b)
            .into_iter()
            .map(|id| f.table.method(id).signature().to_string())
            .collect();
        assert_eq!(outstanding, vec!["f/0", "h/0"]);
    }

    #[test]
    fn concrete_method_later_in_chain_implements() {
        let mut f = Fixture::new();
        let s = f.declare("S", TypeDefKind::Class, Modifiers::empty());
        let t = f.declare("T", TypeDefKind::Trait, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(c, Some(s), vec![t]);
        f.method(s, "f", 0, false);
        f.method(t, "f", 0, true);

        assert_eq!(f.names(&f.table.resolve_supertype_chain(c)), vec!["C", "T", "S", "Any"]);
        assert!(f.table.abstract_members_of(c).is_empty());
    }

    #[test]
    fn abstract_signature_is_reported_once() {
        let mut f = Fixture::new();
        let t1 = f.declare("T1", TypeDefKind::Trait, Modifiers::empty());
        let t2 = f.declare("T2", TypeDefKind::Trait, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(c, None, vec![t1, t2]);
        f.method(t1, "run", 0, true);
        f.method(t2, "run", 0, true);

        let outstanding = f.table.abstract_members_of(c);
        assert_eq!(outstanding.len(), 1);
        assert_eq!(f.table.method(outstanding[0]).owner, t1);
    }

    #[test]
    fn implementation_is_first_in_chain_order() {
        let mut f = Fixture::new();
        let s = f.declare("S", TypeDefKind::Class, Modifiers::empty());
        let t = f.declare("T", TypeDefKind::Trait, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(c, Some(s), vec![t]);
        f.method(s, "f", 0, false);
        f.method(t, "f", 0, false);

        let signature = Signature {
            name: "f".to_string(),
            arity: 0,
        };
        let implementation = f.table.find_implementation(c, &signature).unwrap();
        assert_eq!(f.table.method(implementation).owner, t);
        assert_eq!(
            f.table.find_implementation(c, &Signature { name: "f".to_string(), arity: 1 }),
            None
        );
    }

    #[test]
    fn removing_supertypes() {
        let mut f = Fixture::new();
        let s = f.declare("S", TypeDefKind::Class, Modifiers::empty());
        let t = f.declare("T", TypeDefKind::Trait, Modifiers::empty());
        let c = f.declare("C", TypeDefKind::Class, Modifiers::empty());
        f.inherit(c, Some(s), vec![t]);
        assert_eq!(f.table.direct_supertypes(c), vec![s, t]);

        f.table.remove_supertype(c, s);
        assert_eq!(f.table.direct_supertypes(c), vec![t]);
    }
}
