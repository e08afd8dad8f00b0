//! Three-address-code intermediate representation
//!
//! A compilation unit lowers to one flat, ordered `Vec<Instr>`. Class and
//! method boundaries are marked in-stream by `FIELD_DECL`, `FUNC_ENTRY`,
//! `PARAM_DECL` and `FUNC_EXIT`.

pub mod instr;
pub mod pretty;
pub mod value;

pub use instr::{BinaryOp, Instr, MangledName, Opcode, UnaryOp};
pub use pretty::PrettyPrint;
pub use value::{Constant, Label, Operand, Temp, THIS};
