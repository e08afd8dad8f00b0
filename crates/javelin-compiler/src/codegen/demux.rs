//! Partition a TAC stream by class
//!
//! The stream interleaves classes; grouping first lets every class be
//! generated with its own constant pool and method list.

use crate::ir::Instr;
use rustc_hash::FxHashMap;

/// Instructions belonging to one class, in stream order
#[derive(Debug)]
pub struct ClassGroup<'i> {
    pub name: String,
    pub instructions: Vec<&'i Instr>,
}

/// Group `instrs` by the class they belong to.
///
/// The current class starts as `main_class`, and switches on every
/// `FIELD_DECL` and `FUNC_ENTRY`. Groups appear in order of first
/// appearance.
pub fn demultiplex<'i>(instrs: &'i [Instr], main_class: &str) -> Vec<ClassGroup<'i>> {
    let mut groups: Vec<ClassGroup<'i>> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut current = main_class.to_string();

    for instr in instrs {
        match instr {
            Instr::FieldDecl { class, .. } => current = class.clone(),
            Instr::FuncEntry { name, .. } => {
                current = name.class.clone().unwrap_or_else(|| main_class.to_string());
            }
            _ => {}
        }

        let slot = match index.get(&current) {
            Some(&slot) => slot,
            None => {
                groups.push(ClassGroup {
                    name: current.clone(),
                    instructions: Vec::new(),
                });
                index.insert(current.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].instructions.push(instr);
    }

    groups
}
