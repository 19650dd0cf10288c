//! Semantic descriptions of declared classes and their members.

use crate::ast::{Modifiers, TypeDefKind, TypeExpr, Variance};
use crate::source::InputSpan;
use std::fmt::{self, Display, Formatter};

/// Identifies a class, trait or object in the `SymbolTable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(super) usize);

impl ClassId {
    /// The universal root type `Any`, which every supertype chain ends with.
    pub const ROOT: ClassId = ClassId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub(super) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(super) usize);

/// A class member, in the order members were declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberId {
    Field(FieldId),
    Method(MethodId),
}

#[derive(Clone, Debug)]
pub struct TypeParameterDescriptor {
    pub name: String,
    pub variance: Variance,
}

/// Supertype as written in the source, before it is resolved.
#[derive(Clone, Debug)]
pub struct ParentName {
    pub name: String,
    pub span: InputSpan,
}

#[derive(Clone, Debug)]
pub struct ClassDescriptor {
    pub name: String,
    pub kind: TypeDefKind,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameterDescriptor>,

    /// Members accepted into the class scope, in declaration order. Members rejected as
    /// duplicates are not listed here.
    pub members: Vec<MemberId>,

    /// Parents in the order they were written: `extends` first, then `with` clauses.
    pub parent_names: Vec<ParentName>,

    /// Resolved superclass. `None` means the class inherits directly from the root.
    pub superclass: Option<ClassId>,

    /// Resolved trait parents, in declaration order.
    pub traits: Vec<ClassId>,

    /// `None` only for the root type, which has no source.
    pub definition_site: Option<InputSpan>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeDefKind, modifiers: Modifiers) -> ClassDescriptor {
        ClassDescriptor {
            name: name.into(),
            kind,
            modifiers,
            type_parameters: Vec::new(),
            members: Vec::new(),
            parent_names: Vec::new(),
            superclass: None,
            traits: Vec::new(),
            definition_site: None,
        }
    }

    pub fn is_trait(&self) -> bool {
        self.kind == TypeDefKind::Trait
    }

    pub fn has_abstract_modifier(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    /// Whether the class may leave methods without implementation: traits and `abstract`
    /// classes.
    pub fn may_be_incomplete(&self) -> bool {
        self.is_trait() || self.has_abstract_modifier()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.members.iter().filter_map(|member| match member {
            MemberId::Field(field) => Some(*field),
            MemberId::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.members.iter().filter_map(|member| match member {
            MemberId::Method(method) => Some(*method),
            MemberId::Field(_) => None,
        })
    }
}

/// What makes two methods the same for overriding purposes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub arity: usize,
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_: Option<TypeExpr>,
    pub span: InputSpan,
}

#[derive(Clone, Debug)]
pub struct MethodDescriptor {
    pub name: String,
    pub modifiers: Modifiers,

    /// Parameters of all clauses, flattened.
    pub parameters: Vec<ParameterDescriptor>,

    pub return_type: Option<TypeExpr>,

    /// Set iff the method has no body.
    pub is_abstract: bool,

    pub owner: ClassId,
    pub definition_site: Option<InputSpan>,
}

impl MethodDescriptor {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn signature(&self) -> Signature {
        Signature {
            name: self.name.clone(),
            arity: self.arity(),
        }
    }

    /// Human-readable signature, e.g. `def area(scale: Double): Double`.
    pub fn describe(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|parameter| match parameter.type_ {
                Some(ref type_) => format!("{}: {}", parameter.name, type_),
                None => parameter.name.clone(),
            })
            .collect();

        let mut text = format!("def {}", self.name);
        if !parameters.is_empty() {
            text.push_str(&format!("({})", parameters.join(", ")));
        }
        if let Some(ref return_type) = self.return_type {
            text.push_str(&format!(": {}", return_type));
        }
        text
    }
}

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: String,

    /// Declared type. Absent when it has to be inferred from the initializer.
    pub type_: Option<TypeExpr>,

    pub mutable: bool,

    /// `val`/`var` class parameters are fields initialized by the constructor.
    pub is_constructor_parameter: bool,

    pub has_initializer: bool,

    pub owner: ClassId,
    pub definition_site: Option<InputSpan>,
}
