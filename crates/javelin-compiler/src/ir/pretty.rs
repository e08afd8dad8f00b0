//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging TAC streams.

use super::instr::Instr;
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for [Instr] {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        let mut in_function = false;

        for instr in self {
            let indent = match instr {
                Instr::FuncEntry { .. } => {
                    in_function = true;
                    0
                }
                Instr::FuncExit { .. } => {
                    in_function = false;
                    0
                }
                Instr::FieldDecl { .. } => 0,
                Instr::Label(_) if in_function => 2,
                _ if in_function => 4,
                _ => 0,
            };
            let _ = writeln!(output, "{:indent$}{}", "", instr, indent = indent);
        }

        output
    }
}

impl PrettyPrint for Vec<Instr> {
    fn pretty_print(&self) -> String {
        self.as_slice().pretty_print()
    }
}
