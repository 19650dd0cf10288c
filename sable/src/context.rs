//! Compiler context shared by the passes of one compilation.

use crate::ast;
use crate::errors::DiagnosticSink;
use crate::source::InputSpan;
use crate::symbols::{ClassId, FieldId, MethodId, SymbolTable};
use std::collections::HashMap;

/// State of a single compilation that gets passed along to the analyzer passes.
///
/// Every compilation owns its own context, nothing in it is shared between compilations.
pub struct CompilerContext<'d> {
    pub symbols: SymbolTable,
    pub globals: GlobalEntities,
    pub diagnostics: &'d mut DiagnosticSink,
}

impl<'d> CompilerContext<'d> {
    /// Creates the initial context, with only the root type declared.
    pub fn new(diagnostics: &'d mut DiagnosticSink) -> CompilerContext<'d> {
        CompilerContext {
            symbols: SymbolTable::new(),
            globals: GlobalEntities::new(),
            diagnostics,
        }
    }
}

/// A registry mapping syntactic declarations to their descriptors in the symbol table.
pub struct GlobalEntities {
    classes: HashMap<InputSpan, ClassId>,
    fields: HashMap<InputSpan, FieldId>,
    methods: HashMap<InputSpan, MethodId>,
}

impl GlobalEntities {
    pub fn new() -> GlobalEntities {
        GlobalEntities {
            classes: HashMap::new(),
            fields: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    pub fn register_class(&mut self, type_def: &ast::TypeDef, class: ClassId) {
        self.classes.insert(type_def.signature_span, class);
    }

    pub fn register_field(&mut self, field_def: &ast::FieldDef, field: FieldId) {
        self.fields.insert(field_def.span, field);
    }

    /// Registers a `val`/`var` class parameter, which is a field as well.
    pub fn register_parameter_field(&mut self, parameter: &ast::Parameter, field: FieldId) {
        self.fields.insert(parameter.span, field);
    }

    pub fn register_method(&mut self, method_def: &ast::FunctionDef, method: MethodId) {
        self.methods.insert(method_def.signature_span, method);
    }

    pub fn class(&self, type_def: &ast::TypeDef) -> ClassId {
        *self.classes.get(&type_def.signature_span).unwrap_or_else(|| {
            panic!(
                "{} `{}` was not analyzed in previous passes",
                type_def.kind.keyword(),
                type_def.name.text
            )
        })
    }

    pub fn field(&self, field_def: &ast::FieldDef) -> FieldId {
        *self.fields.get(&field_def.span).unwrap_or_else(|| {
            panic!(
                "Field `{}` was not analyzed in previous passes",
                field_def.name.text
            )
        })
    }

    /// Field created for a `val`/`var` class parameter, if it is one.
    pub fn parameter_field(&self, parameter: &ast::Parameter) -> Option<FieldId> {
        self.fields.get(&parameter.span).copied()
    }

    pub fn method(&self, method_def: &ast::FunctionDef) -> MethodId {
        *self.methods.get(&method_def.signature_span).unwrap_or_else(|| {
            panic!(
                "Method `{}` was not analyzed in previous passes",
                method_def.name.text
            )
        })
    }
}
