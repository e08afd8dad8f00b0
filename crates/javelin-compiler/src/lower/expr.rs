//! Expression lowering
//!
//! Each expression lowers in post-order and yields the operand holding
//! its value.

use super::Lowerer;
use crate::ast::{
    AssignmentExpression, BinaryExpression, CallExpression, Expression, MemberExpression,
    NewExpression, UnaryExpression,
};
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, Constant, Instr, Operand, UnaryOp};
use javelin_bytecode::{FieldRef, MethodRef, ValueKind};

/// Receiver resolution of a call
enum CallTarget {
    Virtual { receiver: Operand, owner: String },
    Static { owner: String },
}

/// Resolved static type of an expression
fn static_type(expr: &Expression) -> CompileResult<&str> {
    expr.ty().ok_or_else(|| CompileError::MissingType {
        construct: expr.describe(),
    })
}

impl<'a> Lowerer<'a> {
    /// Lower an expression and return the operand holding its value
    pub(super) fn lower_expr(&mut self, expr: &Expression) -> CompileResult<Operand> {
        let ty = static_type(expr)?;

        match expr {
            Expression::IntLiteral(lit) => {
                let value = i32::try_from(lit.value).map_err(|_| CompileError::InvalidLiteral {
                    text: lit.value.to_string(),
                    ty: ty.to_string(),
                })?;
                Ok(self.load_const(Constant::Int(value)))
            }
            Expression::BooleanLiteral(lit) => Ok(self.load_const(Constant::Bool(lit.value))),
            Expression::StringLiteral(lit) => Ok(self.load_const(Constant::Str(lit.value.clone()))),
            Expression::NullLiteral(_) => Ok(self.load_const(Constant::Null)),
            Expression::Identifier(ident) if ident.is_this() => Ok(Operand::this()),
            Expression::Identifier(ident) => {
                let kind = self.kind_of(ty)?;
                let dest = self.new_temp();
                self.emit(Instr::LoadVar {
                    dest,
                    src: ident.name.clone(),
                    kind,
                });
                Ok(Operand::Temp(dest))
            }
            Expression::Binary(binary) => self.lower_binary(binary, ty),
            Expression::Unary(unary) => self.lower_unary(unary),
            Expression::Assignment(assign) => self.lower_assignment(assign),
            Expression::New(new_expr) => self.lower_new(new_expr),
            Expression::Call(call) => self.lower_call(call),
            Expression::Member(member) => self.lower_member(member),
        }
    }

    fn load_const(&mut self, value: Constant) -> Operand {
        let dest = self.new_temp();
        self.emit(Instr::LoadConst { dest, value });
        Operand::Temp(dest)
    }

    fn lower_binary(&mut self, binary: &BinaryExpression, ty: &str) -> CompileResult<Operand> {
        let left = self.lower_expr(&binary.left)?;
        let right = self.lower_expr(&binary.right)?;

        let op = BinaryOp::from_operator(&binary.operator).ok_or_else(|| {
            CompileError::UnknownOperator {
                op: binary.operator.clone(),
            }
        })?;
        if op.is_arithmetic() && ty != "int" {
            let feature = if ty == "String" && op == BinaryOp::Add {
                "string concatenation".to_string()
            } else {
                format!("arithmetic on {}", ty)
            };
            return Err(CompileError::UnsupportedFeature { feature });
        }

        let dest = self.new_temp();
        self.emit(Instr::Binary {
            op,
            dest,
            left,
            right,
        });
        Ok(Operand::Temp(dest))
    }

    fn lower_unary(&mut self, unary: &UnaryExpression) -> CompileResult<Operand> {
        let op = match unary.operator.as_str() {
            "!" => UnaryOp::Not,
            "-" => UnaryOp::Neg,
            "++" => return self.lower_postfix(BinaryOp::Add, &unary.operand),
            "--" => return self.lower_postfix(BinaryOp::Sub, &unary.operand),
            other => {
                return Err(CompileError::UnknownOperator {
                    op: other.to_string(),
                })
            }
        };

        let operand = self.lower_expr(&unary.operand)?;
        let dest = self.new_temp();
        self.emit(Instr::Unary { op, dest, operand });
        Ok(Operand::Temp(dest))
    }

    /// `x++` / `x--`: store the updated value, yield the original
    fn lower_postfix(&mut self, op: BinaryOp, target: &Expression) -> CompileResult<Operand> {
        let ty = static_type(target)?;
        if ty != "int" {
            return Err(CompileError::UnsupportedFeature {
                feature: format!("increment of {}", ty),
            });
        }

        match target {
            Expression::Identifier(ident) if !ident.is_this() => {
                let old = self.new_temp();
                self.emit(Instr::LoadVar {
                    dest: old,
                    src: ident.name.clone(),
                    kind: ValueKind::Primitive,
                });
                let updated = self.apply_step(op, old.into());
                self.emit(Instr::StoreVar {
                    dest: ident.name.clone(),
                    src: updated,
                    kind: ValueKind::Primitive,
                });
                Ok(Operand::Temp(old))
            }
            Expression::Member(member) => {
                let object = self.lower_expr(&member.object)?;
                let field = self.field_ref(member)?;
                let old = self.new_temp();
                self.emit(Instr::GetField {
                    dest: old,
                    object: object.clone(),
                    field: field.clone(),
                });
                let updated = self.apply_step(op, old.into());
                self.emit(Instr::PutField {
                    object,
                    field,
                    value: updated,
                });
                Ok(Operand::Temp(old))
            }
            other => Err(CompileError::InvalidAssignmentTarget {
                target: other.describe(),
            }),
        }
    }

    /// `value op 1`
    fn apply_step(&mut self, op: BinaryOp, value: Operand) -> Operand {
        let one = self.load_const(Constant::Int(1));
        let dest = self.new_temp();
        self.emit(Instr::Binary {
            op,
            dest,
            left: value,
            right: one,
        });
        Operand::Temp(dest)
    }

    fn lower_assignment(&mut self, assign: &AssignmentExpression) -> CompileResult<Operand> {
        let value = self.lower_expr(&assign.value)?;

        match assign.target.as_ref() {
            Expression::Identifier(ident) if !ident.is_this() => {
                let kind = self.kind_of(static_type(&assign.target)?)?;
                self.emit(Instr::StoreVar {
                    dest: ident.name.clone(),
                    src: value.clone(),
                    kind,
                });
            }
            Expression::Member(member) => {
                let object = self.lower_expr(&member.object)?;
                let field = self.field_ref(member)?;
                self.emit(Instr::PutField {
                    object,
                    field,
                    value: value.clone(),
                });
            }
            other => {
                return Err(CompileError::InvalidAssignmentTarget {
                    target: other.describe(),
                })
            }
        }
        Ok(value)
    }

    fn lower_new(&mut self, new_expr: &NewExpression) -> CompileResult<Operand> {
        let args = self.lower_args(&new_expr.arguments)?;
        let descriptor = self.signatures.constructor(&new_expr.class)?;

        let object = self.new_temp();
        self.emit(Instr::NewAlloc {
            dest: object,
            class: new_expr.class.clone(),
        });
        let arg_count = args.len();
        for value in args {
            self.emit(Instr::Param { value });
        }
        self.emit(Instr::NewConstruct {
            object,
            class: new_expr.class.clone(),
            arg_count,
            descriptor,
        });
        Ok(Operand::Temp(object))
    }

    fn lower_call(&mut self, call: &CallExpression) -> CompileResult<Operand> {
        let target = match &call.object {
            Some(object) => {
                let owner = self.class_type(object, &call.method)?;
                let receiver = self.lower_expr(object)?;
                CallTarget::Virtual { receiver, owner }
            }
            None => match &self.current_class {
                Some(class) if self.signatures.has_method(class, &call.method) => {
                    CallTarget::Virtual {
                        receiver: Operand::this(),
                        owner: class.clone(),
                    }
                }
                _ => CallTarget::Static {
                    owner: self.signatures.main_class().to_string(),
                },
            },
        };
        let args = self.lower_args(&call.arguments)?;

        let dest = self.new_temp();
        match target {
            CallTarget::Virtual { receiver, owner } => {
                let descriptor = self.signatures.method(&owner, &call.method)?.clone();
                self.emit(Instr::Param {
                    value: receiver.clone(),
                });
                for value in args {
                    self.emit(Instr::Param { value });
                }
                self.emit(Instr::CallVirtual {
                    dest,
                    receiver,
                    method: MethodRef::new(owner, call.method.clone(), descriptor),
                });
            }
            CallTarget::Static { owner } => {
                if self.signatures.is_entry_point(&call.method) {
                    return Err(CompileError::UnsupportedFeature {
                        feature: format!("call to entry point `{}`", call.method),
                    });
                }
                let descriptor = self.signatures.method(&owner, &call.method)?.clone();
                for value in args {
                    self.emit(Instr::Param { value });
                }
                self.emit(Instr::CallStatic {
                    dest,
                    method: MethodRef::new(owner, call.method.clone(), descriptor),
                });
            }
        }
        Ok(Operand::Temp(dest))
    }

    fn lower_member(&mut self, member: &MemberExpression) -> CompileResult<Operand> {
        let object = self.lower_expr(&member.object)?;
        let field = self.field_ref(member)?;
        let dest = self.new_temp();
        self.emit(Instr::GetField {
            dest,
            object,
            field,
        });
        Ok(Operand::Temp(dest))
    }

    fn lower_args(&mut self, args: &[Expression]) -> CompileResult<Vec<Operand>> {
        args.iter().map(|arg| self.lower_expr(arg)).collect()
    }

    /// `owner:field` with the field's descriptor taken from the access type
    fn field_ref(&self, member: &MemberExpression) -> CompileResult<FieldRef> {
        let owner = self.class_type(&member.object, &member.property)?;
        let ty = member.ty.as_deref().ok_or_else(|| CompileError::MissingType {
            construct: format!("field access `.{}`", member.property),
        })?;
        let descriptor = self.signatures.field_type(ty)?;
        Ok(FieldRef::new(owner, member.property.clone(), descriptor))
    }

    /// Static type of `object`, which must be a declared class
    fn class_type(&self, object: &Expression, member: &str) -> CompileResult<String> {
        let owner = static_type(object)?;
        if self.signatures.is_class(owner) {
            Ok(owner.to_string())
        } else {
            Err(CompileError::MissingDescriptor {
                owner: owner.to_string(),
                member: member.to_string(),
            })
        }
    }
}
