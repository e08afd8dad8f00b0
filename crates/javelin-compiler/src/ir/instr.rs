//! Three-address-code instructions

use super::value::{Constant, Label, Operand, Temp};
use javelin_bytecode::{FieldRef, FieldType, MethodDescriptor, MethodRef, ValueKind};
use std::fmt;

/// Closed set of TAC opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    LoadConst,
    LoadVar,
    StoreVar,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Not,
    Neg,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    IfZ,
    Goto,
    Label,
    Param,
    CallVirtual,
    CallStatic,
    NewAlloc,
    NewConstruct,
    GetField,
    PutField,
    Return,
    FuncEntry,
    ParamDecl,
    FuncExit,
    FieldDecl,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        match self {
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::LoadVar => "LOAD_VAR",
            Opcode::StoreVar => "STORE_VAR",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Neg => "NEG",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::IfZ => "IFZ",
            Opcode::Goto => "GOTO",
            Opcode::Label => "LABEL",
            Opcode::Param => "PARAM",
            Opcode::CallVirtual => "CALL_VIRTUAL",
            Opcode::CallStatic => "CALL_STATIC",
            Opcode::NewAlloc => "NEW_ALLOC",
            Opcode::NewConstruct => "NEW_CONSTRUCT",
            Opcode::GetField => "GET_FIELD",
            Opcode::PutField => "PUT_FIELD",
            Opcode::Return => "RETURN",
            Opcode::FuncEntry => "FUNC_ENTRY",
            Opcode::ParamDecl => "PARAM_DECL",
            Opcode::FuncExit => "FUNC_EXIT",
            Opcode::FieldDecl => "FIELD_DECL",
        }
    }

    /// Markers structure the stream rather than compute values
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            Opcode::FuncEntry | Opcode::ParamDecl | Opcode::FuncExit | Opcode::FieldDecl
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Map a source operator
    pub fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Neq,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            _ => return None,
        })
    }

    pub fn opcode(self) -> Opcode {
        match self {
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Div => Opcode::Div,
            BinaryOp::Mod => Opcode::Mod,
            BinaryOp::And => Opcode::And,
            BinaryOp::Or => Opcode::Or,
            BinaryOp::Eq => Opcode::Eq,
            BinaryOp::Neq => Opcode::Neq,
            BinaryOp::Lt => Opcode::Lt,
            BinaryOp::Le => Opcode::Le,
            BinaryOp::Gt => Opcode::Gt,
            BinaryOp::Ge => Opcode::Ge,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Neq | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn opcode(self) -> Opcode {
        match self {
            UnaryOp::Not => Opcode::Not,
            UnaryOp::Neg => Opcode::Neg,
        }
    }
}

/// Function name as it appears in FUNC_ENTRY/FUNC_EXIT: `Class.member`
/// for methods, a bare name for top-level functions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MangledName {
    pub class: Option<String>,
    pub member: String,
}

impl MangledName {
    pub fn method(class: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            member: member.into(),
        }
    }

    pub fn function(member: impl Into<String>) -> Self {
        Self {
            class: None,
            member: member.into(),
        }
    }

    /// Whether this names the constructor of its class
    pub fn is_constructor(&self) -> bool {
        self.class.as_deref() == Some(self.member.as_str())
    }
}

impl fmt::Display for MangledName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}.{}", class, self.member),
            None => write!(f, "{}", self.member),
        }
    }
}

/// TAC instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    /// dest = constant
    LoadConst { dest: Temp, value: Constant },

    /// dest = local
    LoadVar {
        dest: Temp,
        src: String,
        kind: ValueKind,
    },

    /// local = src
    StoreVar {
        dest: String,
        src: Operand,
        kind: ValueKind,
    },

    /// dest = left op right
    Binary {
        op: BinaryOp,
        dest: Temp,
        left: Operand,
        right: Operand,
    },

    /// dest = op operand
    Unary {
        op: UnaryOp,
        dest: Temp,
        operand: Operand,
    },

    /// Jump to target when cond is zero
    IfZ { cond: Operand, target: Label },

    /// Unconditional jump
    Goto { target: Label },

    /// Jump target definition
    Label(Label),

    /// Push an argument (or receiver) for the next call or construction
    Param { value: Operand },

    /// dest = receiver.method(params); dest is only written for non-void
    /// methods
    CallVirtual {
        dest: Temp,
        receiver: Operand,
        method: MethodRef,
    },

    /// dest = Owner.method(params)
    CallStatic { dest: Temp, method: MethodRef },

    /// dest = uninitialised instance of class
    NewAlloc { dest: Temp, class: String },

    /// Run the constructor on the instance allocated into `object`
    NewConstruct {
        object: Temp,
        class: String,
        arg_count: usize,
        descriptor: MethodDescriptor,
    },

    /// dest = object.field
    GetField {
        dest: Temp,
        object: Operand,
        field: FieldRef,
    },

    /// object.field = value
    PutField {
        object: Operand,
        field: FieldRef,
        value: Operand,
    },

    /// Return, with a value for non-void methods
    Return { value: Option<Operand> },

    /// Start of a function body
    FuncEntry {
        name: MangledName,
        param_count: usize,
        descriptor: MethodDescriptor,
    },

    /// Formal parameter, in slot order
    ParamDecl { name: String, ty: FieldType },

    /// End of a function body
    FuncExit { name: MangledName },

    /// Field of a class
    FieldDecl {
        class: String,
        name: String,
        ty: FieldType,
    },
}

impl Instr {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instr::LoadConst { .. } => Opcode::LoadConst,
            Instr::LoadVar { .. } => Opcode::LoadVar,
            Instr::StoreVar { .. } => Opcode::StoreVar,
            Instr::Binary { op, .. } => op.opcode(),
            Instr::Unary { op, .. } => op.opcode(),
            Instr::IfZ { .. } => Opcode::IfZ,
            Instr::Goto { .. } => Opcode::Goto,
            Instr::Label(_) => Opcode::Label,
            Instr::Param { .. } => Opcode::Param,
            Instr::CallVirtual { .. } => Opcode::CallVirtual,
            Instr::CallStatic { .. } => Opcode::CallStatic,
            Instr::NewAlloc { .. } => Opcode::NewAlloc,
            Instr::NewConstruct { .. } => Opcode::NewConstruct,
            Instr::GetField { .. } => Opcode::GetField,
            Instr::PutField { .. } => Opcode::PutField,
            Instr::Return { .. } => Opcode::Return,
            Instr::FuncEntry { .. } => Opcode::FuncEntry,
            Instr::ParamDecl { .. } => Opcode::ParamDecl,
            Instr::FuncExit { .. } => Opcode::FuncExit,
            Instr::FieldDecl { .. } => Opcode::FieldDecl,
        }
    }

    /// Kind of the value this instruction writes, if it writes one
    pub fn result_kind(&self) -> Option<ValueKind> {
        match self {
            Instr::LoadConst { value, .. } => Some(value.kind()),
            Instr::LoadVar { kind, .. } | Instr::StoreVar { kind, .. } => Some(*kind),
            Instr::Binary { .. } | Instr::Unary { .. } => Some(ValueKind::Primitive),
            Instr::CallVirtual { method, .. } | Instr::CallStatic { method, .. } => {
                method.descriptor.return_kind()
            }
            Instr::NewAlloc { .. } | Instr::NewConstruct { .. } => Some(ValueKind::Reference),
            Instr::GetField { field, .. } => Some(field.descriptor.kind()),
            _ => None,
        }
    }

    /// Label this instruction may jump to
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Instr::IfZ { target, .. } | Instr::Goto { target } => Some(*target),
            _ => None,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Instr::Return { .. })
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::LoadConst { dest, value } => write!(f, "{} = {}", dest, value),
            Instr::LoadVar { dest, src, .. } => write!(f, "{} = {}", dest, src),
            Instr::StoreVar { dest, src, .. } => write!(f, "{} = {}", dest, src),
            Instr::Binary {
                op,
                dest,
                left,
                right,
            } => write!(f, "{} = {} {} {}", dest, left, op.opcode(), right),
            Instr::Unary { op, dest, operand } => {
                write!(f, "{} = {} {}", dest, op.opcode(), operand)
            }
            Instr::IfZ { cond, target } => write!(f, "IFZ {} {}", cond, target),
            Instr::Goto { target } => write!(f, "GOTO {}", target),
            Instr::Label(label) => write!(f, "{}:", label),
            Instr::Param { value } => write!(f, "PARAM {}", value),
            Instr::CallVirtual {
                dest,
                receiver,
                method,
            } => write!(f, "{} = CALL_VIRTUAL {} {}", dest, receiver, method),
            Instr::CallStatic { dest, method } => write!(f, "{} = CALL_STATIC {}", dest, method),
            Instr::NewAlloc { dest, class } => write!(f, "{} = NEW_ALLOC {}", dest, class),
            Instr::NewConstruct {
                object,
                class,
                arg_count,
                descriptor,
            } => write!(
                f,
                "NEW_CONSTRUCT {} {} {} {}",
                object, class, arg_count, descriptor
            ),
            Instr::GetField {
                dest,
                object,
                field,
            } => write!(f, "{} = GET_FIELD {} {}", dest, object, field),
            Instr::PutField {
                object,
                field,
                value,
            } => write!(f, "PUT_FIELD {} {} {}", object, field, value),
            Instr::Return { value: Some(v) } => write!(f, "RETURN {}", v),
            Instr::Return { value: None } => write!(f, "RETURN"),
            Instr::FuncEntry {
                name,
                param_count,
                descriptor,
            } => write!(f, "FUNC_ENTRY {} {} {}", name, param_count, descriptor),
            Instr::ParamDecl { name, ty } => write!(f, "PARAM_DECL {} {}", name, ty),
            Instr::FuncExit { name } => write!(f, "FUNC_EXIT {}", name),
            Instr::FieldDecl { class, name, ty } => {
                write!(f, "FIELD_DECL {} {} {}", class, name, ty)
            }
        }
    }
}
