//! Lowering of method bodies to stack machine instructions.

use crate::ast;
use std::collections::HashSet;

/// Names visible from inside the methods of one class.
pub struct ClassEnvironment<'a> {
    pub fields: HashSet<&'a str>,
    pub methods: HashSet<&'a str>,
    pub objects: &'a HashSet<String>,

    /// Classes provided by the runtime library rather than the compiled program.
    pub runtime_classes: &'a HashSet<String>,
    pub runtime_library: &'a str,
}

pub struct MethodBody<'p> {
    pub instructions: Vec<String>,
    pub locals: usize,

    /// Closures encountered in the body, in the order their indices were assigned.
    pub closures: Vec<&'p ast::ClosureExpr>,
}

/// Lowers a single method body. Argument 0 is always the receiver.
pub struct Lowering<'e, 'p> {
    env: &'e ClassEnvironment<'e>,
    parameters: Vec<&'p str>,
    scope: Vec<(&'p str, usize)>,
    next_local: usize,
    next_label: usize,
    first_closure: usize,
    closures: Vec<&'p ast::ClosureExpr>,
    instructions: Vec<String>,
}

impl<'e, 'p> Lowering<'e, 'p> {
    pub fn new(
        env: &'e ClassEnvironment<'e>,
        parameters: impl IntoIterator<Item = &'p ast::Parameter>,
        first_closure: usize,
    ) -> Lowering<'e, 'p> {
        Lowering {
            env,
            parameters: parameters
                .into_iter()
                .map(|parameter| parameter.name.text.as_str())
                .collect(),
            scope: vec![],
            next_local: 0,
            next_label: 0,
            first_closure,
            closures: vec![],
            instructions: vec![],
        }
    }

    pub fn finish(self) -> MethodBody<'p> {
        MethodBody {
            instructions: self.instructions,
            locals: self.next_local,
            closures: self.closures,
        }
    }

    pub fn emit(&mut self, instruction: impl Into<String>) {
        self.instructions.push(instruction.into());
    }

    pub fn argument_index(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|parameter| *parameter == name)
            .map(|index| index + 1)
    }

    fn local_slot(&self, name: &str) -> Option<usize> {
        self.scope
            .iter()
            .rev()
            .find(|(local, _)| *local == name)
            .map(|(_, slot)| *slot)
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.next_label);
        self.next_label += 1;
        label
    }

    /// Emits code leaving the value of `expression` on the stack.
    pub fn lower(&mut self, expression: &'p ast::Expression) {
        match expression {
            ast::Expression::Empty(_) | ast::Expression::Null(_) => self.emit("ldnull"),
            ast::Expression::Unit(_) => self.emit("ldunit"),
            ast::Expression::IntLiteral(literal) => self.emit(format!("ldc.i8 {}", literal.value)),
            ast::Expression::FloatLiteral(literal) => {
                self.emit(format!("ldc.r8 {:?}", literal.value))
            }
            ast::Expression::BoolLiteral(literal) => {
                self.emit(format!("ldc.i4 {}", literal.value as i32))
            }
            ast::Expression::CharLiteral(literal) => {
                self.emit(format!("ldc.i4 {}", literal.value as u32))
            }
            ast::Expression::StringLiteral(literal) => {
                self.emit(format!("ldstr {:?}", literal.value))
            }
            ast::Expression::This(_) => self.emit("ldarg.0"),
            ast::Expression::Variable(variable) => self.lower_variable(&variable.name.text),
            ast::Expression::Select(select) => {
                self.lower(&select.receiver);
                self.emit(format!("ldmember {}", select.name.text));
            }
            ast::Expression::Call(call) => self.lower_call(call),
            ast::Expression::New(new) => {
                for argument in &new.arguments {
                    self.lower(argument);
                }
                let class_name = self.class_reference(&new.type_.name.text);
                self.emit(format!(
                    "newobj {}::.ctor({})",
                    class_name,
                    new.arguments.len()
                ));
            }
            ast::Expression::UnaryOp(unary) => {
                self.lower(&unary.operand);
                self.emit(format!("callvirt unary_{}(0)", unary.operator.text));
            }
            ast::Expression::BinaryOp(binary) => {
                self.lower(&binary.lhs);
                self.lower(&binary.rhs);
                self.emit(format!("callvirt {}(1)", binary.operator.text));
            }
            ast::Expression::Assign(assign) => {
                self.lower_assignment(assign);
                self.emit("ldunit");
            }
            ast::Expression::If(if_) => {
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.lower(&if_.cond);
                self.emit(format!("brfalse {}", else_label));
                self.lower(&if_.then);
                self.emit(format!("br {}", end_label));
                self.emit(format!("{}:", else_label));
                match &if_.else_ {
                    Some(else_) => self.lower(else_),
                    None => self.emit("ldunit"),
                }
                self.emit(format!("{}:", end_label));
            }
            ast::Expression::While(while_) => {
                let start_label = self.new_label();
                let end_label = self.new_label();
                self.emit(format!("{}:", start_label));
                self.lower(&while_.cond);
                self.emit(format!("brfalse {}", end_label));
                self.lower(&while_.body);
                self.emit("pop");
                self.emit(format!("br {}", start_label));
                self.emit(format!("{}:", end_label));
                self.emit("ldunit");
            }
            ast::Expression::Closure(closure) => {
                let index = self.first_closure + self.closures.len();
                self.closures.push(closure);
                self.emit(format!("ldftn <closure>{}", index));
                self.emit(format!(
                    "newobj [{}]Function{}::.ctor(1)",
                    self.env.runtime_library,
                    closure.parameters.len()
                ));
            }
            ast::Expression::Block(block) => self.lower_block(block),
        }
    }

    fn lower_variable(&mut self, name: &str) {
        if let Some(slot) = self.local_slot(name) {
            self.emit(format!("ldloc.{}", slot));
        } else if let Some(index) = self.argument_index(name) {
            self.emit(format!("ldarg.{}", index));
        } else if self.env.fields.contains(name) {
            self.emit("ldarg.0");
            self.emit(format!("ldfld {}", name));
        } else if self.env.methods.contains(name) {
            self.emit("ldarg.0");
            self.emit(format!("callvirt {}(0)", name));
        } else if self.env.objects.contains(name) {
            self.emit(format!("ldsfld {}::instance", name));
        } else {
            self.emit(format!("ldsym {}", name));
        }
    }

    fn lower_call(&mut self, call: &'p ast::CallExpr) {
        let arity = call.arguments.len();
        let method_name = match &*call.callee {
            ast::Expression::Select(select) => {
                self.lower(&select.receiver);
                select.name.text.as_str()
            }
            ast::Expression::Variable(variable)
                if self.env.methods.contains(variable.name.text.as_str())
                    && self.local_slot(&variable.name.text).is_none()
                    && self.argument_index(&variable.name.text).is_none() =>
            {
                self.emit("ldarg.0");
                variable.name.text.as_str()
            }
            callee => {
                self.lower(callee);
                "apply"
            }
        };

        for argument in &call.arguments {
            self.lower(argument);
        }
        self.emit(format!("callvirt {}({})", method_name, arity));
    }

    fn lower_assignment(&mut self, assign: &'p ast::AssignExpr) {
        match &*assign.target {
            ast::Expression::Variable(variable) => {
                let name = variable.name.text.as_str();
                if let Some(slot) = self.local_slot(name) {
                    self.lower(&assign.value);
                    self.emit(format!("stloc.{}", slot));
                } else if let Some(index) = self.argument_index(name) {
                    self.lower(&assign.value);
                    self.emit(format!("starg.{}", index));
                } else if self.env.fields.contains(name) {
                    self.emit("ldarg.0");
                    self.lower(&assign.value);
                    self.emit(format!("stfld {}", name));
                } else {
                    self.lower(&assign.value);
                    self.emit(format!("stsym {}", name));
                }
            }
            ast::Expression::Select(select) => {
                self.lower(&select.receiver);
                self.lower(&assign.value);
                self.emit(format!("stmember {}", select.name.text));
            }
            target => {
                // Applies `update` on other targets, e.g. `a(i) = v` means `a.update(i, v)`.
                self.lower(target);
                self.lower(&assign.value);
                self.emit("callvirt update(1)");
                self.emit("pop");
            }
        }
    }

    fn lower_block(&mut self, block: &'p ast::BlockExpr) {
        let scope_size = self.scope.len();
        let mut produced_value = false;

        for (index, statement) in block.statements.iter().enumerate() {
            let is_last = index + 1 == block.statements.len();
            match statement {
                ast::Statement::Local(local) => {
                    self.lower(&local.initializer);
                    let slot = self.next_local;
                    self.next_local += 1;
                    self.scope.push((local.name.text.as_str(), slot));
                    self.emit(format!("stloc.{}", slot));
                }
                ast::Statement::Expr(expression) => {
                    self.lower(expression);
                    if is_last {
                        produced_value = true;
                    } else {
                        self.emit("pop");
                    }
                }
            }
        }

        if !produced_value {
            self.emit("ldunit");
        }
        self.scope.truncate(scope_size);
    }

    fn class_reference(&self, name: &str) -> String {
        if self.env.runtime_classes.contains(name) {
            format!("[{}]{}", self.env.runtime_library, name)
        } else {
            name.to_string()
        }
    }
}
