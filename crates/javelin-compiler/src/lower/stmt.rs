//! Statement lowering

use super::Lowerer;
use crate::ast::{ReturnStatement, Statement, VariableDecl};
use crate::error::CompileResult;
use crate::ir::{Constant, Instr, Operand};
use javelin_bytecode::FieldType;

impl<'a> Lowerer<'a> {
    /// Lower a statement
    pub(super) fn lower_stmt(&mut self, stmt: &Statement) -> CompileResult<()> {
        match stmt {
            Statement::VariableDecl(decl) => self.lower_var_decl(decl),
            Statement::Expression(expr_stmt) => {
                self.lower_expr(&expr_stmt.expression)?;
                Ok(())
            }
            Statement::Return(ret) => self.lower_return(ret),
            Statement::Block(block) => {
                for stmt in &block.statements {
                    self.lower_stmt(stmt)?;
                }
                Ok(())
            }
            Statement::If(if_stmt) => self.lower_if(if_stmt),
            Statement::While(while_stmt) => self.lower_while(while_stmt),
            Statement::For(for_stmt) => self.lower_for(for_stmt),
        }
    }

    /// Declarations without an initializer store the type's zero value
    fn lower_var_decl(&mut self, decl: &VariableDecl) -> CompileResult<()> {
        let ty = self.signatures.field_type(&decl.ty)?;
        let value = match &decl.initializer {
            Some(init) => self.lower_expr(init)?,
            None => {
                let dest = self.new_temp();
                self.emit(Instr::LoadConst {
                    dest,
                    value: zero_value(&ty),
                });
                Operand::Temp(dest)
            }
        };

        self.emit(Instr::StoreVar {
            dest: decl.name.clone(),
            src: value,
            kind: ty.kind(),
        });
        Ok(())
    }

    fn lower_return(&mut self, ret: &ReturnStatement) -> CompileResult<()> {
        let value = match &ret.value {
            Some(expr) => Some(self.lower_expr(expr)?),
            None => None,
        };
        self.emit(Instr::Return { value });
        Ok(())
    }
}

fn zero_value(ty: &FieldType) -> Constant {
    match ty {
        FieldType::Int => Constant::Int(0),
        FieldType::Boolean => Constant::Bool(false),
        FieldType::Object(_) | FieldType::Array(_) => Constant::Null,
    }
}
