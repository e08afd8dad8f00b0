//! AST to TAC Lowering
//!
//! Converts the type-checked AST into one flat TAC instruction stream.
//! Classes contribute `FIELD_DECL` markers followed by their methods;
//! each function body is bracketed by `FUNC_ENTRY`/`FUNC_EXIT`.

mod control_flow;
mod expr;
mod stmt;

use crate::ast::{ClassDecl, FunctionDecl, Item, Program};
use crate::error::{CompileError, CompileResult};
use crate::ir::{Instr, Label, MangledName, Temp, THIS};
use crate::signature::SignatureTable;
use javelin_bytecode::{FieldType, ValueKind};
use log::debug;

/// AST to TAC lowerer
pub struct Lowerer<'a> {
    /// Descriptors of every method in the compilation unit
    signatures: &'a SignatureTable,
    /// Emitted instructions
    instructions: Vec<Instr>,
    /// Next temporary ID
    next_temp: u32,
    /// Next label ID
    next_label: u32,
    /// Class whose method is being lowered; `None` for top-level functions
    current_class: Option<String>,
}

impl<'a> Lowerer<'a> {
    /// Create a new lowerer
    pub fn new(signatures: &'a SignatureTable) -> Self {
        Self {
            signatures,
            instructions: Vec::new(),
            next_temp: 0,
            next_label: 0,
            current_class: None,
        }
    }

    /// Lower a whole program. Temporaries and labels are numbered from
    /// zero on every call.
    pub fn lower_program(&mut self, program: &Program) -> CompileResult<Vec<Instr>> {
        self.instructions.clear();
        self.next_temp = 0;
        self.next_label = 0;
        self.current_class = None;

        for item in &program.items {
            match item {
                Item::Class(class) => self.lower_class(class)?,
                Item::Function(function) => self.lower_function(None, function)?,
            }
        }

        debug!(
            "lowered program: {} instructions, {} temps, {} labels",
            self.instructions.len(),
            self.next_temp,
            self.next_label
        );
        Ok(std::mem::take(&mut self.instructions))
    }

    /// Lower a class declaration
    fn lower_class(&mut self, class: &ClassDecl) -> CompileResult<()> {
        debug!("lowering class {}", class.name);

        for field in &class.fields {
            if field.initializer.is_some() {
                return Err(CompileError::UnsupportedFeature {
                    feature: format!("initializer on field {}.{}", class.name, field.name),
                });
            }
            let ty = self.signatures.field_type(&field.ty)?;
            self.emit(Instr::FieldDecl {
                class: class.name.clone(),
                name: field.name.clone(),
                ty,
            });
        }

        for method in &class.methods {
            self.lower_function(Some(&class.name), method)?;
        }
        Ok(())
    }

    /// Lower a method (`class` set) or a top-level function
    fn lower_function(&mut self, class: Option<&str>, func: &FunctionDecl) -> CompileResult<()> {
        let owner = class.unwrap_or_else(|| self.signatures.main_class()).to_string();
        self.current_class = class.map(str::to_string);
        let result = self.lower_function_body(class, func);
        self.current_class = None;
        result.map_err(|e| e.in_method(owner, &func.name))
    }

    fn lower_function_body(&mut self, class: Option<&str>, func: &FunctionDecl) -> CompileResult<()> {
        let is_constructor = class == Some(func.name.as_str());
        let descriptor = self.signatures.describe(func, is_constructor)?;
        let name = match class {
            Some(class) => MangledName::method(class, &func.name),
            None => MangledName::function(&func.name),
        };
        debug!("lowering function {}{}", name, descriptor);

        self.emit(Instr::FuncEntry {
            name: name.clone(),
            param_count: func.params.len(),
            descriptor: descriptor.clone(),
        });

        if let Some(class) = class {
            self.emit(Instr::ParamDecl {
                name: THIS.to_string(),
                ty: FieldType::object(class),
            });
        }
        for (param, ty) in func.params.iter().zip(&descriptor.params) {
            self.emit(Instr::ParamDecl {
                name: param.name.clone(),
                ty: ty.clone(),
            });
        }

        for stmt in &func.body.statements {
            self.lower_stmt(stmt)?;
        }

        let ends_in_return = self.instructions.last().is_some_and(Instr::is_return);
        if descriptor.is_void() && !ends_in_return {
            self.emit(Instr::Return { value: None });
        }

        self.emit(Instr::FuncExit { name });
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn emit(&mut self, instr: Instr) {
        self.instructions.push(instr);
    }

    /// Allocate a fresh temporary
    fn new_temp(&mut self) -> Temp {
        let temp = Temp::new(self.next_temp);
        self.next_temp += 1;
        temp
    }

    /// Allocate a fresh label
    fn new_label(&mut self) -> Label {
        let label = Label::new(self.next_label);
        self.next_label += 1;
        label
    }

    fn kind_of(&self, ty: &str) -> CompileResult<ValueKind> {
        self.signatures.value_kind(ty)
    }
}
