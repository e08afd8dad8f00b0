//! Bytecode verification
//!
//! Abstract interpretation of operand stack depth over each method's
//! control flow graph.

use crate::class::{ClassFile, MethodDef};
use crate::constants::ConstantPool;
use crate::opcode::Instruction;

/// Bytecode verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Branch to a label that was never bound
    #[error("{method}: branch at {index} targets unbound label {label}")]
    UnboundLabel {
        method: String,
        index: usize,
        label: String,
    },

    /// Branch to a label bound past the last instruction
    #[error("{method}: invalid jump target {label} at {index}")]
    InvalidJumpTarget {
        method: String,
        index: usize,
        label: String,
    },

    /// Stack underflow
    #[error("{method}: stack underflow at {index}")]
    StackUnderflow { method: String, index: usize },

    /// Stack deeper than the declared maximum
    #[error("{method}: stack depth {depth} exceeds max_stack {max} at {index}")]
    StackOverflow {
        method: String,
        index: usize,
        depth: u16,
        max: u16,
    },

    /// Two paths reach an instruction with different stack depths
    #[error("{method}: inconsistent stack depth at {index} ({first} vs {second})")]
    StackMismatch {
        method: String,
        index: usize,
        first: u16,
        second: u16,
    },

    /// Invalid local variable reference
    #[error("{method}: local {slot} out of range (max_locals {max}) at {index}")]
    InvalidLocalRef {
        method: String,
        index: usize,
        slot: u16,
        max: u16,
    },

    /// Invalid constant pool reference
    #[error("{method}: invalid constant pool index {constant} at {index}")]
    InvalidConstantRef {
        method: String,
        index: usize,
        constant: u16,
    },

    /// Execution falls off end
    #[error("{method}: execution falls off the end of the code")]
    FallOffEnd { method: String },
}

/// Verify every method of a class
pub fn verify_class(class: &ClassFile) -> Result<(), VerifyError> {
    for method in &class.methods {
        verify_method(method, &class.constants)?;
    }
    Ok(())
}

/// Verify a single method's code
pub fn verify_method(method: &MethodDef, constants: &ConstantPool) -> Result<(), VerifyError> {
    let name = format!("{}{}", method.name, method.descriptor);
    let code = &method.code;

    verify_operands(&name, method, constants)?;

    if code.is_empty() {
        return Err(VerifyError::FallOffEnd { method: name });
    }

    // Stack depth on entry to each instruction, once reached
    let mut depths: Vec<Option<u16>> = vec![None; code.len()];
    let mut worklist = vec![(0usize, 0u16)];

    while let Some((index, depth)) = worklist.pop() {
        if index >= code.len() {
            return Err(VerifyError::FallOffEnd { method: name });
        }
        match depths[index] {
            Some(seen) if seen == depth => continue,
            Some(seen) => {
                return Err(VerifyError::StackMismatch {
                    method: name,
                    index,
                    first: seen,
                    second: depth,
                })
            }
            None => depths[index] = Some(depth),
        }

        let instr = &code.instructions[index];
        let (pops, pushes) = instr.stack_effect();
        let after = depth
            .checked_sub(pops)
            .ok_or_else(|| VerifyError::StackUnderflow {
                method: name.clone(),
                index,
            })?
            + pushes;
        let peak = depth.max(after);
        if peak > method.max_stack {
            return Err(VerifyError::StackOverflow {
                method: name,
                index,
                depth: peak,
                max: method.max_stack,
            });
        }

        if let Some(label) = instr.branch_target() {
            let target = code
                .label_position(label)
                .ok_or_else(|| VerifyError::UnboundLabel {
                    method: name.clone(),
                    index,
                    label: label.to_string(),
                })?;
            if target >= code.len() {
                return Err(VerifyError::InvalidJumpTarget {
                    method: name,
                    index,
                    label: label.to_string(),
                });
            }
            worklist.push((target, after));
        }

        if !instr.is_terminator() {
            worklist.push((index + 1, after));
        }
    }

    Ok(())
}

/// Check locals and constant pool operands, reachable or not
fn verify_operands(name: &str, method: &MethodDef, constants: &ConstantPool) -> Result<(), VerifyError> {
    for (index, instr) in method.code.instructions.iter().enumerate() {
        if let Some(slot) = instr.local_slot() {
            if slot >= method.max_locals {
                return Err(VerifyError::InvalidLocalRef {
                    method: name.to_string(),
                    index,
                    slot,
                    max: method.max_locals,
                });
            }
        }
        if let Instruction::Ldc(constant) = instr {
            if constants.get(*constant).is_none() {
                return Err(VerifyError::InvalidConstantRef {
                    method: name.to_string(),
                    index,
                    constant: *constant,
                });
            }
        }
    }
    Ok(())
}
