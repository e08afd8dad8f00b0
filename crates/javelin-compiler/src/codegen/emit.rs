//! Instruction selection
//!
//! Lowers one TAC instruction at a time into JVM instructions. Every
//! value-producing TAC instruction ends by storing into its target's slot.

use super::context::MethodContext;
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, Constant, Instr, Operand, Temp, UnaryOp};
use javelin_bytecode::{
    Condition, ConstantPool, Instruction, MethodDescriptor, MethodRef, ValueKind, CONSTRUCTOR_NAME,
};

impl MethodContext {
    /// Lower a TAC instruction inside this method
    pub(super) fn lower(&mut self, instr: &Instr, pool: &mut ConstantPool) -> CompileResult<()> {
        match instr {
            Instr::LoadConst { dest, value } => {
                self.push_constant(value, pool)?;
                self.store(&Operand::Temp(*dest), value.kind())?;
            }
            Instr::LoadVar { dest, src, kind } => {
                self.load(&Operand::local(src.as_str()))?;
                self.store(&Operand::Temp(*dest), *kind)?;
            }
            Instr::StoreVar { dest, src, kind } => {
                self.load(src)?;
                self.store(&Operand::local(dest.as_str()), *kind)?;
            }
            Instr::Binary {
                op,
                dest,
                left,
                right,
            } if op.is_comparison() => self.compare(*op, *dest, left, right)?,
            Instr::Binary {
                op,
                dest,
                left,
                right,
            } => {
                self.load(left)?;
                self.load(right)?;
                self.emit(arithmetic(*op)?);
                self.store(&Operand::Temp(*dest), ValueKind::Primitive)?;
            }
            Instr::Unary { op, dest, operand } => {
                self.load(operand)?;
                match op {
                    UnaryOp::Not => {
                        self.emit(Instruction::Iconst(1));
                        self.emit(Instruction::Ixor);
                    }
                    UnaryOp::Neg => self.emit(Instruction::Ineg),
                }
                self.store(&Operand::Temp(*dest), ValueKind::Primitive)?;
            }
            Instr::IfZ { cond, target } => {
                self.load(cond)?;
                let target = self.label(*target);
                self.emit(Instruction::If {
                    cond: Condition::Eq,
                    target,
                });
            }
            Instr::Goto { target } => {
                let target = self.label(*target);
                self.emit(Instruction::Goto(target));
            }
            Instr::Label(label) => {
                let id = self.label(*label);
                if !self.bind(id) {
                    return Err(CompileError::DuplicateLabel {
                        label: label.to_string(),
                    });
                }
            }
            Instr::Param { value } => {
                self.load(value)?;
            }
            Instr::CallVirtual { dest, method, .. } => {
                self.emit(Instruction::InvokeVirtual(method.clone()));
                self.store_result(*dest, &method.descriptor)?;
            }
            Instr::CallStatic { dest, method } => {
                self.emit(Instruction::InvokeStatic(method.clone()));
                self.store_result(*dest, &method.descriptor)?;
            }
            Instr::NewAlloc { class, .. } => {
                self.emit(Instruction::New(class.clone()));
                self.emit(Instruction::Dup);
            }
            Instr::NewConstruct {
                object,
                class,
                descriptor,
                ..
            } => {
                self.emit(Instruction::InvokeSpecial(MethodRef::new(
                    class.clone(),
                    CONSTRUCTOR_NAME,
                    descriptor.clone(),
                )));
                self.store(&Operand::Temp(*object), ValueKind::Reference)?;
            }
            Instr::GetField {
                dest,
                object,
                field,
            } => {
                self.load(object)?;
                self.emit(Instruction::GetField(field.clone()));
                self.store(&Operand::Temp(*dest), field.descriptor.kind())?;
            }
            Instr::PutField {
                object,
                field,
                value,
            } => {
                self.load(object)?;
                self.load(value)?;
                self.emit(Instruction::PutField(field.clone()));
            }
            Instr::Return { value: Some(value) } => {
                let kind = self.load(value)?;
                self.emit(Instruction::Return(Some(kind)));
            }
            Instr::Return { value: None } => self.emit(Instruction::Return(None)),
            Instr::ParamDecl { name, ty } => self.declare_param(name, ty)?,
            Instr::FuncEntry { .. } | Instr::FuncExit { .. } | Instr::FieldDecl { .. } => {
                return Err(CompileError::InternalError {
                    message: format!("{} reached instruction selection", instr.opcode()),
                })
            }
        }
        Ok(())
    }

    /// Narrowest push of a constant
    fn push_constant(&mut self, value: &Constant, pool: &mut ConstantPool) -> CompileResult<()> {
        let instr = match value {
            Constant::Int(v) => match Instruction::push_int(*v) {
                Some(push) => push,
                None => Instruction::Ldc(pool.add_integer(*v)?),
            },
            Constant::Bool(b) => Instruction::Iconst(i8::from(*b)),
            Constant::Str(s) => Instruction::Ldc(pool.add_string(s.as_str())?),
            Constant::Null => Instruction::AconstNull,
        };
        self.emit(instr);
        Ok(())
    }

    /// Comparisons only exist as branches on the JVM:
    /// `if_<cmp> Ltrue; iconst_0; goto Lend; Ltrue: iconst_1; Lend:`
    fn compare(&mut self, op: BinaryOp, dest: Temp, left: &Operand, right: &Operand) -> CompileResult<()> {
        let left_kind = self.load(left)?;
        let right_kind = self.load(right)?;
        let cond = condition(op)?;

        let on_true = self.fresh_label();
        let end = self.fresh_label();
        let branch = match (left_kind, right_kind) {
            (ValueKind::Primitive, ValueKind::Primitive) => Instruction::IfIcmp {
                cond,
                target: on_true,
            },
            (ValueKind::Reference, ValueKind::Reference)
                if matches!(cond, Condition::Eq | Condition::Ne) =>
            {
                Instruction::IfAcmp {
                    cond,
                    target: on_true,
                }
            }
            _ => {
                return Err(CompileError::InvalidReferenceComparison { op: op.opcode() });
            }
        };

        self.emit(branch);
        self.emit(Instruction::Iconst(0));
        self.emit(Instruction::Goto(end));
        self.bind(on_true);
        self.emit(Instruction::Iconst(1));
        self.bind(end);
        self.store(&Operand::Temp(dest), ValueKind::Primitive)?;
        Ok(())
    }

    fn store_result(&mut self, dest: Temp, descriptor: &MethodDescriptor) -> CompileResult<()> {
        if let Some(kind) = descriptor.return_kind() {
            self.store(&Operand::Temp(dest), kind)?;
        }
        Ok(())
    }
}

fn arithmetic(op: BinaryOp) -> CompileResult<Instruction> {
    Ok(match op {
        BinaryOp::Add => Instruction::Iadd,
        BinaryOp::Sub => Instruction::Isub,
        BinaryOp::Mul => Instruction::Imul,
        BinaryOp::Div => Instruction::Idiv,
        BinaryOp::Mod => Instruction::Irem,
        BinaryOp::And => Instruction::Iand,
        BinaryOp::Or => Instruction::Ior,
        other => {
            return Err(CompileError::InternalError {
                message: format!("{} is not an arithmetic operator", other.opcode()),
            })
        }
    })
}

fn condition(op: BinaryOp) -> CompileResult<Condition> {
    Ok(match op {
        BinaryOp::Eq => Condition::Eq,
        BinaryOp::Neq => Condition::Ne,
        BinaryOp::Lt => Condition::Lt,
        BinaryOp::Le => Condition::Le,
        BinaryOp::Gt => Condition::Gt,
        BinaryOp::Ge => Condition::Ge,
        other => {
            return Err(CompileError::InternalError {
                message: format!("{} is not a comparison", other.opcode()),
            })
        }
    })
}
