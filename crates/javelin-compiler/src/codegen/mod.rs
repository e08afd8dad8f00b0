//! TAC to JVM Code Generation
//!
//! Splits the TAC stream into per-class groups, then lowers every
//! `FUNC_ENTRY`..`FUNC_EXIT` region into a method with its own slot and
//! label tables.

mod context;
mod demux;
mod emit;

pub use demux::{demultiplex, ClassGroup};

use crate::error::{CompileError, CompileResult};
use crate::ir::Instr;
use crate::options::CompilerOptions;
use context::MethodContext;
use javelin_bytecode::{
    access, ClassFile, Code, FieldDef, Instruction, MethodDef, MethodDescriptor, MethodRef,
    ValueKind, CONSTRUCTOR_NAME,
};
use log::debug;

/// Code generator that transforms TAC into class units
pub struct CodeGenerator<'a> {
    options: &'a CompilerOptions,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator
    pub fn new(options: &'a CompilerOptions) -> Self {
        Self { options }
    }

    /// Generate one class per class name in the stream, in order of first
    /// appearance
    pub fn generate(&self, instrs: &[Instr]) -> CompileResult<Vec<ClassFile>> {
        demultiplex(instrs, &self.options.main_class)
            .into_iter()
            .map(|group| self.generate_class(group))
            .collect()
    }

    fn generate_class(&self, group: ClassGroup<'_>) -> CompileResult<ClassFile> {
        let mut class = ClassFile::new(group.name.as_str());
        class.super_name = self.options.super_class.clone();

        let mut current: Option<MethodContext> = None;
        for instr in group.instructions {
            match instr {
                Instr::FieldDecl { name, ty, .. } => {
                    if class.field(name).is_none() {
                        class.fields.push(FieldDef::new(name.as_str(), ty.clone()));
                    }
                }
                Instr::FuncEntry {
                    name, descriptor, ..
                } => {
                    if let Some(open) = &current {
                        return Err(CompileError::NestedMethod {
                            name: name.to_string(),
                        }
                        .in_method(&group.name, open.member_name()));
                    }
                    let ctx = MethodContext::open(name, descriptor, self.options)
                        .map_err(|e| e.in_method(&group.name, &name.member))?;
                    current = Some(ctx);
                }
                Instr::FuncExit { name } => {
                    let ctx = match current.take() {
                        Some(ctx) if ctx.source_name() == name => ctx,
                        _ => {
                            return Err(CompileError::UnmatchedExit {
                                name: name.to_string(),
                            })
                        }
                    };
                    let member = ctx.member_name().to_string();
                    let method = ctx
                        .finish()
                        .map_err(|e| e.in_method(&group.name, &member))?;
                    class.methods.push(method);
                }
                other => {
                    let ctx = current.as_mut().ok_or(CompileError::InstructionOutsideMethod {
                        opcode: other.opcode(),
                    })?;
                    ctx.lower(other, &mut class.constants)
                        .map_err(|e| e.in_method(&group.name, ctx.member_name()))?;
                }
            }
        }

        if let Some(open) = current {
            return Err(CompileError::UnterminatedMethod {
                name: open.source_name().to_string(),
            });
        }

        if !class.has_constructor() {
            class
                .methods
                .insert(0, default_constructor(&self.options.super_class));
        }

        debug!(
            "generated class {}: {} fields, {} methods, {} constants",
            class.name,
            class.fields.len(),
            class.methods.len(),
            class.constants.len()
        );
        Ok(class)
    }
}

/// `public <init>()V { super(); }`
fn default_constructor(super_class: &str) -> MethodDef {
    let mut code = Code::new();
    code.emit(Instruction::load(ValueKind::Reference, 0));
    code.emit(Instruction::InvokeSpecial(MethodRef::new(
        super_class,
        CONSTRUCTOR_NAME,
        MethodDescriptor::void(),
    )));
    code.emit(Instruction::Return(None));

    MethodDef {
        name: CONSTRUCTOR_NAME.to_string(),
        descriptor: MethodDescriptor::void(),
        access: access::PUBLIC,
        max_stack: 1,
        max_locals: 1,
        code,
    }
}
