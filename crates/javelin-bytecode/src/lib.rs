//! Javelin JVM Bytecode Definitions
//!
//! This crate provides the JVM instruction subset, type descriptors,
//! class output units, constant pool and verifier used by the Javelin
//! code generator.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class;
pub mod constants;
pub mod descriptor;
pub mod jasmin;
pub mod opcode;
pub mod verify;

pub use class::{access, ClassFile, Code, FieldDef, MethodDef, CONSTRUCTOR_NAME};
pub use constants::{Constant, ConstantPool, PoolOverflow};
pub use descriptor::{DescriptorError, FieldType, MethodDescriptor, ValueKind, OBJECT_CLASS, STRING_CLASS};
pub use opcode::{Condition, FieldRef, Instruction, LabelId, MethodRef};
pub use verify::{verify_class, verify_method, VerifyError};
