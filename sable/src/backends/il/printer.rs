use super::lowering::{ClassEnvironment, Lowering, MethodBody};
use crate::ast::{self, Modifiers, TypeDefKind};
use crate::options::BuildOptions;
use crate::source::InputSpanFile;
use crate::symbols::{ClassId, SymbolTable};
use std::collections::{HashSet, VecDeque};
use std::fmt::{self, Write};

pub struct IlPrinter {
    code: String,
    indent_level: usize,
}

impl IlPrinter {
    pub fn new() -> IlPrinter {
        IlPrinter {
            code: String::new(),
            indent_level: 0,
        }
    }

    pub fn write_program(
        &mut self,
        program: &ast::Program,
        symbols: &SymbolTable,
        options: &BuildOptions,
    ) -> fmt::Result {
        write!(self, ".assembly extern {} {{}}\n", options.runtime_library)?;
        write!(self, ".assembly {} {{}}\n", options.output_name)?;

        let objects: HashSet<String> = program
            .definitions
            .iter()
            .filter(|type_def| type_def.kind == TypeDefKind::Object)
            .map(|type_def| type_def.name.text.clone())
            .collect();
        let runtime_classes: HashSet<String> = symbols
            .class_ids()
            .filter(|id| is_runtime_class(symbols, *id))
            .map(|id| symbols.class(id).name.clone())
            .collect();

        for type_def in &program.definitions {
            let id = symbols
                .lookup_class(&type_def.name.text)
                .expect("Class was not analyzed in previous passes");

            write!(self, "\n")?;
            self.write_class(
                type_def,
                id,
                symbols,
                &ClassEnvironmentSource {
                    objects: &objects,
                    runtime_classes: &runtime_classes,
                    runtime_library: &options.runtime_library,
                },
            )?;
        }

        Ok(())
    }

    fn write_class(
        &mut self,
        type_def: &ast::TypeDef,
        id: ClassId,
        symbols: &SymbolTable,
        source: &ClassEnvironmentSource,
    ) -> fmt::Result {
        let class = symbols.class(id);
        let env = source.environment_for(symbols, id);

        write!(self, ".class public ")?;
        let mut modifiers = class.modifiers;
        match class.kind {
            TypeDefKind::Trait => {
                modifiers.remove(Modifiers::ABSTRACT);
                write!(self, "abstract interface ")?;
            }
            TypeDefKind::Object => {
                modifiers.remove(Modifiers::FINAL);
                write!(self, "final object ")?;
            }
            TypeDefKind::Class => {}
        }
        for keyword in modifiers.keywords() {
            write!(self, "{} ", keyword)?;
        }
        write!(self, "{}", class.name)?;

        if !class.type_parameters.is_empty() {
            let type_parameters: Vec<String> = class
                .type_parameters
                .iter()
                .map(|parameter| format!("{}{}", parameter.variance.sigil(), parameter.name))
                .collect();
            write!(self, "<{}>", type_parameters.join(", "))?;
        }

        if !class.is_trait() {
            let superclass = class.superclass.unwrap_or(ClassId::ROOT);
            write!(self, " extends {}", qualified_name(symbols, superclass, source.runtime_library))?;
        }
        if !class.traits.is_empty() {
            let traits: Vec<String> = class
                .traits
                .iter()
                .map(|trait_| qualified_name(symbols, *trait_, source.runtime_library))
                .collect();
            write!(self, " implements {}", traits.join(", "))?;
        }
        write!(self, " {{\n")?;
        self.indent();

        for parameter in &type_def.parameters {
            if let Some(binding) = parameter.binding {
                self.write_field_decl(
                    &parameter.modifiers,
                    binding == ast::Binding::Val,
                    &parameter.name.text,
                    parameter.type_.as_ref(),
                )?;
            }
        }
        for field_def in type_def.fields() {
            self.write_field_decl(
                &field_def.modifiers,
                !field_def.mutable,
                &field_def.name.text,
                field_def.type_.as_ref(),
            )?;
        }

        let mut closures = VecDeque::new();
        let mut closure_count = 0;

        if !class.is_trait() {
            let body = self.lower_constructor(type_def, id, symbols, &env, closure_count);
            closure_count += body.closures.len();
            closures.extend(body.closures.iter().copied());
            write!(self, "\n.method public .ctor(")?;
            self.write_parameters(&type_def.parameters)?;
            write!(self, ")")?;
            self.write_method_body(&body)?;
        }

        for method_def in type_def.methods() {
            write!(self, "\n.method ")?;
            write!(self, "{} ", visibility(&method_def.modifiers))?;
            if method_def.is_abstract() {
                write!(self, "abstract ")?;
            }
            write!(self, "{}(", method_def.name.text)?;
            let parameters: Vec<&ast::Parameter> = method_def.parameters().collect();
            self.write_parameter_refs(&parameters)?;
            write!(self, ")")?;
            if let Some(return_type) = &method_def.return_type {
                write!(self, ": {}", return_type)?;
            }

            match &method_def.body {
                Some(body) => {
                    let mut lowering =
                        Lowering::new(&env, method_def.parameters(), closure_count);
                    lowering.lower(body);
                    lowering.emit("ret");
                    let body = lowering.finish();
                    closure_count += body.closures.len();
                    closures.extend(body.closures.iter().copied());
                    self.write_method_body(&body)?;
                }
                None => write!(self, "\n")?,
            }
        }

        let mut closure_index = 0;
        while let Some(closure) = closures.pop_front() {
            let mut lowering = Lowering::new(&env, closure.parameters.iter(), closure_count);
            lowering.lower(&closure.body);
            lowering.emit("ret");
            let body = lowering.finish();
            closure_count += body.closures.len();
            closures.extend(body.closures.iter().copied());

            write!(self, "\n.method private <closure>{}(", closure_index)?;
            self.write_parameters(&closure.parameters)?;
            write!(self, ")")?;
            self.write_method_body(&body)?;
            closure_index += 1;
        }

        self.dedent();
        write!(self, "}}\n")
    }

    fn lower_constructor<'p>(
        &self,
        type_def: &'p ast::TypeDef,
        id: ClassId,
        symbols: &SymbolTable,
        env: &ClassEnvironment,
        first_closure: usize,
    ) -> MethodBody<'p> {
        let class = symbols.class(id);
        let superclass = class.superclass.unwrap_or(ClassId::ROOT);
        let superclass_name = &symbols.class(superclass).name;
        let superclass_arguments: &[ast::Expression] = type_def
            .parents
            .iter()
            .find(|parent| parent.name().map(|name| &name.text) == Some(superclass_name))
            .map(|parent| parent.arguments.as_slice())
            .unwrap_or(&[]);

        let mut lowering = Lowering::new(env, type_def.parameters.iter(), first_closure);
        lowering.emit("ldarg.0");
        for argument in superclass_arguments {
            lowering.lower(argument);
        }
        lowering.emit(format!(
            "call {}::.ctor({})",
            qualified_name(symbols, superclass, env.runtime_library),
            superclass_arguments.len()
        ));

        for parameter in &type_def.parameters {
            if parameter.binding.is_some() {
                let index = lowering
                    .argument_index(&parameter.name.text)
                    .expect("Constructor parameter was not registered");
                lowering.emit("ldarg.0");
                lowering.emit(format!("ldarg.{}", index));
                lowering.emit(format!("stfld {}", parameter.name.text));
            }
        }
        for field_def in type_def.fields() {
            if let Some(initializer) = &field_def.initializer {
                lowering.emit("ldarg.0");
                lowering.lower(initializer);
                lowering.emit(format!("stfld {}", field_def.name.text));
            }
        }
        lowering.emit("ret");
        lowering.finish()
    }

    fn write_field_decl(
        &mut self,
        modifiers: &ast::ModifierList,
        read_only: bool,
        name: &str,
        type_: Option<&ast::TypeExpr>,
    ) -> fmt::Result {
        write!(self, ".field {} ", visibility(modifiers))?;
        if read_only {
            write!(self, "initonly ")?;
        }
        write!(self, "{}", name)?;
        if let Some(type_) = type_ {
            write!(self, ": {}", type_)?;
        }
        write!(self, "\n")
    }

    fn write_parameters(&mut self, parameters: &[ast::Parameter]) -> fmt::Result {
        let parameters: Vec<&ast::Parameter> = parameters.iter().collect();
        self.write_parameter_refs(&parameters)
    }

    fn write_parameter_refs(&mut self, parameters: &[&ast::Parameter]) -> fmt::Result {
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                write!(self, ", ")?;
            }
            write!(self, "{}", parameter.name.text)?;
            if let Some(type_) = &parameter.type_ {
                write!(self, ": {}", type_)?;
            }
        }
        Ok(())
    }

    fn write_method_body(&mut self, body: &MethodBody) -> fmt::Result {
        write!(self, " {{\n")?;
        self.indent();
        if body.locals > 0 {
            write!(self, ".locals ({})\n", body.locals)?;
        }
        for instruction in &body.instructions {
            write!(self, "{}\n", instruction)?;
        }
        self.dedent();
        write!(self, "}}\n")
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level -= 1;
    }
}

/// Program-wide inputs for building per-class environments.
struct ClassEnvironmentSource<'a> {
    objects: &'a HashSet<String>,
    runtime_classes: &'a HashSet<String>,
    runtime_library: &'a str,
}

impl<'a> ClassEnvironmentSource<'a> {
    fn environment_for(&self, symbols: &'a SymbolTable, id: ClassId) -> ClassEnvironment<'a> {
        let chain = symbols.resolve_supertype_chain(id);
        let fields = chain
            .iter()
            .flat_map(|class| symbols.class(*class).fields())
            .map(|field| symbols.field(field).name.as_str())
            .collect();
        let methods = chain
            .iter()
            .flat_map(|class| symbols.class(*class).methods())
            .map(|method| symbols.method(method).name.as_str())
            .collect();

        ClassEnvironment {
            fields,
            methods,
            objects: self.objects,
            runtime_classes: self.runtime_classes,
            runtime_library: self.runtime_library,
        }
    }
}

fn is_runtime_class(symbols: &SymbolTable, id: ClassId) -> bool {
    match symbols.class(id).definition_site {
        Some(span) => span.file == InputSpanFile::Prelude,
        None => true,
    }
}

fn qualified_name(symbols: &SymbolTable, id: ClassId, runtime_library: &str) -> String {
    let name = &symbols.class(id).name;
    if is_runtime_class(symbols, id) {
        format!("[{}]{}", runtime_library, name)
    } else {
        name.clone()
    }
}

fn visibility(modifiers: &ast::ModifierList) -> &'static str {
    if modifiers.contains(Modifiers::PRIVATE) {
        "private"
    } else if modifiers.contains(Modifiers::PROTECTED) {
        "family"
    } else {
        "public"
    }
}

impl fmt::Write for IlPrinter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let lines = s.split('\n');

        for (index, line) in lines.enumerate() {
            if index > 0 {
                write!(&mut self.code, "\n")?;
            }

            if line.len() > 0 {
                if self.code.ends_with('\n') {
                    for _ in 0..self.indent_level {
                        write!(&mut self.code, "  ")?;
                    }
                }

                write!(&mut self.code, "{}", line)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for IlPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
