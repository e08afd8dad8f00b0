//! Control flow lowering
//!
//! Structured statements become IFZ/GOTO jumps between labels.

use super::Lowerer;
use crate::ast::{ForStatement, IfStatement, WhileStatement};
use crate::error::CompileResult;
use crate::ir::Instr;

impl<'a> Lowerer<'a> {
    /// `IFZ c Lelse; then; GOTO Lend; Lelse: else; Lend:`
    ///
    /// A missing else branch keeps both labels and the jump.
    pub(super) fn lower_if(&mut self, if_stmt: &IfStatement) -> CompileResult<()> {
        let cond = self.lower_expr(&if_stmt.condition)?;

        let else_label = self.new_label();
        let end = self.new_label();
        self.emit(Instr::IfZ {
            cond,
            target: else_label,
        });
        self.lower_stmt(&if_stmt.then_branch)?;
        self.emit(Instr::Goto { target: end });
        self.emit(Instr::Label(else_label));
        if let Some(else_branch) = &if_stmt.else_branch {
            self.lower_stmt(else_branch)?;
        }
        self.emit(Instr::Label(end));
        Ok(())
    }

    /// `Lstart: c; IFZ c Lend; body; GOTO Lstart; Lend:`
    pub(super) fn lower_while(&mut self, while_stmt: &WhileStatement) -> CompileResult<()> {
        let start = self.new_label();
        let end = self.new_label();

        self.emit(Instr::Label(start));
        let cond = self.lower_expr(&while_stmt.condition)?;
        self.emit(Instr::IfZ { cond, target: end });
        self.lower_stmt(&while_stmt.body)?;
        self.emit(Instr::Goto { target: start });
        self.emit(Instr::Label(end));
        Ok(())
    }

    /// `init; Lstart: c; IFZ c Lend; body; update; GOTO Lstart; Lend:`
    pub(super) fn lower_for(&mut self, for_stmt: &ForStatement) -> CompileResult<()> {
        if let Some(init) = &for_stmt.init {
            self.lower_stmt(init)?;
        }

        let start = self.new_label();
        let end = self.new_label();

        self.emit(Instr::Label(start));
        if let Some(condition) = &for_stmt.condition {
            let cond = self.lower_expr(condition)?;
            self.emit(Instr::IfZ { cond, target: end });
        }
        self.lower_stmt(&for_stmt.body)?;
        if let Some(update) = &for_stmt.update {
            self.lower_expr(update)?;
        }
        self.emit(Instr::Goto { target: start });
        self.emit(Instr::Label(end));
        Ok(())
    }
}
