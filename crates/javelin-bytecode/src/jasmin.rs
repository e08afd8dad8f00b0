//! Jasmin-style textual rendering of class units

use crate::class::{access, ClassFile, FieldDef, MethodDef};
use crate::constants::{Constant, ConstantPool};
use crate::opcode::Instruction;
use std::fmt::{self, Write};

impl fmt::Display for ClassFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".class {}{}", access_words(self.access), self.name)?;
        writeln!(f, ".super {}", self.super_name)?;

        if !self.fields.is_empty() {
            writeln!(f)?;
        }
        for field in &self.fields {
            writeln!(f, "{}", render_field(field))?;
        }

        for method in &self.methods {
            writeln!(f)?;
            f.write_str(&render_method(method, &self.constants))?;
        }
        Ok(())
    }
}

fn access_words(flags: u16) -> String {
    let mut words = String::new();
    if flags & access::PUBLIC != 0 {
        words.push_str("public ");
    }
    if flags & access::STATIC != 0 {
        words.push_str("static ");
    }
    words
}

fn render_field(field: &FieldDef) -> String {
    format!(".field {}{} {}", access_words(field.access), field.name, field.descriptor)
}

/// Render one method, `.method` through `.end method`
pub fn render_method(method: &MethodDef, constants: &ConstantPool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        ".method {}{}{}",
        access_words(method.access),
        method.name,
        method.descriptor
    );
    let _ = writeln!(out, "   .limit stack {}", method.max_stack);
    let _ = writeln!(out, "   .limit locals {}", method.max_locals);

    let code = &method.code;
    for (index, instr) in code.instructions.iter().enumerate() {
        for label in code.labels_at(index) {
            let _ = writeln!(out, "{}:", label);
        }
        let _ = writeln!(out, "   {}", render_instruction(instr, constants));
    }
    for label in code.labels_at(code.len()) {
        let _ = writeln!(out, "{}:", label);
    }

    out.push_str(".end method\n");
    out
}

/// Render a single instruction with its operands
pub fn render_instruction(instr: &Instruction, constants: &ConstantPool) -> String {
    let mnemonic = instr.mnemonic();
    match instr {
        Instruction::Bipush(v) => format!("{} {}", mnemonic, v),
        Instruction::Sipush(v) => format!("{} {}", mnemonic, v),
        Instruction::Ldc(index) => match constants.get(*index) {
            Some(Constant::Integer(v)) => format!("{} {}", mnemonic, v),
            Some(Constant::String(s)) => format!("{} {:?}", mnemonic, s),
            None => format!("{} #{}", mnemonic, index),
        },
        Instruction::Load { slot, .. } | Instruction::Store { slot, .. } if *slot > 3 => {
            format!("{} {}", mnemonic, slot)
        }
        Instruction::If { target, .. }
        | Instruction::IfIcmp { target, .. }
        | Instruction::IfAcmp { target, .. }
        | Instruction::Goto(target) => format!("{} {}", mnemonic, target),
        Instruction::New(class) => format!("{} {}", mnemonic, class),
        Instruction::GetField(field) | Instruction::PutField(field) => format!(
            "{} {}/{} {}",
            mnemonic, field.owner, field.name, field.descriptor
        ),
        Instruction::InvokeVirtual(method)
        | Instruction::InvokeSpecial(method)
        | Instruction::InvokeStatic(method) => format!(
            "{} {}/{}{}",
            mnemonic, method.owner, method.name, method.descriptor
        ),
        _ => mnemonic,
    }
}
