//! Symbol and type table: descriptors for every declared class, trait and object, their
//! members, and the scopes used to find them by name.
//!
//! Descriptors live in arenas owned by `SymbolTable` and refer to each other by id. Declaring
//! something never fails: a name collision is reported to the diagnostic sink, the first
//! declaration stays in the scope, and the later one still gets a descriptor so that passes
//! can keep analyzing it.

mod descriptors;
mod hierarchy;

use crate::ast::{Modifiers, TypeDefKind};
use crate::errors::{self, DiagnosticSink};
use crate::source::InputSpan;
use std::collections::HashMap;

pub use descriptors::{
    ClassDescriptor, ClassId, FieldDescriptor, FieldId, MemberId, MethodDescriptor, MethodId,
    ParameterDescriptor, ParentName, Signature, TypeParameterDescriptor,
};

/// Name of the universal root type.
pub const ROOT_NAME: &str = "Any";

#[derive(Default)]
struct MemberScope {
    fields: HashMap<String, FieldId>,
    methods: HashMap<(String, usize), MethodId>,
}

pub struct SymbolTable {
    classes: Vec<ClassDescriptor>,
    methods: Vec<MethodDescriptor>,
    fields: Vec<FieldDescriptor>,

    types: HashMap<String, ClassId>,
    member_scopes: Vec<MemberScope>,
}

impl SymbolTable {
    /// Creates a table containing only the root type.
    pub fn new() -> SymbolTable {
        let mut table = SymbolTable {
            classes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            types: HashMap::new(),
            member_scopes: Vec::new(),
        };

        let root = ClassDescriptor::new(ROOT_NAME, TypeDefKind::Class, Modifiers::ABSTRACT);
        table.classes.push(root);
        table.member_scopes.push(MemberScope::default());
        table.types.insert(ROOT_NAME.to_string(), ClassId::ROOT);
        table
    }

    /// Registers a class-like type. If its name is taken, reports `DuplicateDeclaration` and
    /// leaves the name bound to the earlier declaration.
    pub fn declare_class(
        &mut self,
        descriptor: ClassDescriptor,
        diagnostics: &mut DiagnosticSink,
    ) -> ClassId {
        let id = ClassId(self.classes.len());

        match self.types.get(&descriptor.name).copied() {
            Some(existing) => {
                let existing = &self.classes[existing.0];
                diagnostics.push(errors::duplicate_declaration(
                    descriptor.kind.keyword(),
                    &descriptor.name,
                    descriptor.definition_site.unwrap_or_else(InputSpan::top_of_file),
                    existing.definition_site,
                ));
            }
            None => {
                self.types.insert(descriptor.name.clone(), id);
            }
        }

        self.classes.push(descriptor);
        self.member_scopes.push(MemberScope::default());
        id
    }

    /// Registers a field of `descriptor.owner`. A field conflicts with fields of the same name
    /// and with parameterless methods of the same name.
    pub fn declare_field(
        &mut self,
        descriptor: FieldDescriptor,
        diagnostics: &mut DiagnosticSink,
    ) -> FieldId {
        let id = FieldId(self.fields.len());
        let owner = descriptor.owner;
        let scope = &self.member_scopes[owner.0];

        let previous = match scope.fields.get(&descriptor.name) {
            Some(field) => Some(self.fields[field.0].definition_site),
            None => scope
                .methods
                .get(&(descriptor.name.clone(), 0))
                .map(|method| self.methods[method.0].definition_site),
        };

        match previous {
            Some(previous) => diagnostics.push(errors::duplicate_declaration(
                "field",
                &descriptor.name,
                descriptor.definition_site.unwrap_or_else(InputSpan::top_of_file),
                previous,
            )),
            None => {
                self.member_scopes[owner.0]
                    .fields
                    .insert(descriptor.name.clone(), id);
                self.classes[owner.0].members.push(MemberId::Field(id));
            }
        }

        self.fields.push(descriptor);
        id
    }

    /// Registers a method of `descriptor.owner`. Methods are distinguished by name and arity;
    /// a parameterless method conflicts with a field of the same name. Repeated parameter names
    /// are reported as well.
    pub fn declare_method(
        &mut self,
        descriptor: MethodDescriptor,
        diagnostics: &mut DiagnosticSink,
    ) -> MethodId {
        let id = MethodId(self.methods.len());
        let owner = descriptor.owner;
        let location = descriptor.definition_site.unwrap_or_else(InputSpan::top_of_file);

        let mut parameter_names: HashMap<&str, InputSpan> = HashMap::new();
        for parameter in &descriptor.parameters {
            if let Some(previous) = parameter_names.get(parameter.name.as_str()) {
                diagnostics.push(errors::duplicate_declaration(
                    "parameter",
                    &parameter.name,
                    parameter.span,
                    Some(*previous),
                ));
            } else {
                parameter_names.insert(&parameter.name, parameter.span);
            }
        }

        let scope = &self.member_scopes[owner.0];
        let key = (descriptor.name.clone(), descriptor.arity());
        let previous = match scope.methods.get(&key) {
            Some(method) => Some(self.methods[method.0].definition_site),
            None if descriptor.arity() == 0 => scope
                .fields
                .get(&descriptor.name)
                .map(|field| self.fields[field.0].definition_site),
            None => None,
        };

        match previous {
            Some(previous) => diagnostics.push(errors::duplicate_declaration(
                "method",
                &descriptor.name,
                location,
                previous,
            )),
            None => {
                self.member_scopes[owner.0].methods.insert(key, id);
                self.classes[owner.0].members.push(MemberId::Method(id));
            }
        }

        self.methods.push(descriptor);
        id
    }

    /// Reports repeated names among class parameters that do not become fields. Parameters
    /// that do become fields are checked by `declare_field`.
    pub fn check_class_parameters<'a>(
        &self,
        parameters: impl IntoIterator<Item = (&'a str, InputSpan)>,
        diagnostics: &mut DiagnosticSink,
    ) {
        let mut seen: HashMap<&str, InputSpan> = HashMap::new();
        for (name, span) in parameters {
            match seen.get(name) {
                Some(previous) => diagnostics.push(errors::duplicate_declaration(
                    "parameter",
                    name,
                    span,
                    Some(*previous),
                )),
                None => {
                    seen.insert(name, span);
                }
            }
        }
    }

    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.types.get(name).copied()
    }

    pub fn class(&self, id: ClassId) -> &ClassDescriptor {
        &self.classes[id.0]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDescriptor {
        &mut self.classes[id.0]
    }

    pub fn method(&self, id: MethodId) -> &MethodDescriptor {
        &self.methods[id.0]
    }

    pub fn field(&self, id: FieldId) -> &FieldDescriptor {
        &self.fields[id.0]
    }

    /// Ids of all declared types, including the root, in declaration order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId)
    }

    /// Members of a class that are part of its scope, in declaration order.
    pub fn members_of(&self, id: ClassId) -> &[MemberId] {
        &self.class(id).members
    }
}
