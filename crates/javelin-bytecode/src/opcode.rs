//! JVM instruction subset
//!
//! Only the instructions the code generator emits are modelled. Branch
//! targets are symbolic [`LabelId`]s resolved through the owning
//! [`Code`](crate::class::Code)'s label table.

use crate::descriptor::{FieldType, MethodDescriptor, ValueKind};
use std::fmt;

/// Symbolic branch target within one method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

impl LabelId {
    /// Create a label id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Index into the label table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Branch condition shared by `if<cond>`, `if_icmp<cond>` and `if_acmp<cond>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// ==
    Eq,
    /// !=
    Ne,
    /// <
    Lt,
    /// >=
    Ge,
    /// >
    Gt,
    /// <=
    Le,
}

impl Condition {
    /// Mnemonic suffix (`eq`, `ne`, ...)
    pub fn suffix(self) -> &'static str {
        match self {
            Condition::Eq => "eq",
            Condition::Ne => "ne",
            Condition::Lt => "lt",
            Condition::Ge => "ge",
            Condition::Gt => "gt",
            Condition::Le => "le",
        }
    }

    /// Evaluate the condition against an ordering of two ints
    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            Condition::Eq => left == right,
            Condition::Ne => left != right,
            Condition::Lt => left < right,
            Condition::Ge => left >= right,
            Condition::Gt => left > right,
            Condition::Le => left <= right,
        }
    }
}

/// Symbolic reference to a method: `owner/name descriptor`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// Internal name of the declaring class
    pub owner: String,
    /// Simple method name (`<init>` for constructors)
    pub name: String,
    /// Method descriptor
    pub descriptor: MethodDescriptor,
}

impl MethodRef {
    /// Create a method reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor,
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.owner, self.name, self.descriptor)
    }
}

/// Symbolic reference to a field: `owner/name descriptor`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Internal name of the declaring class
    pub owner: String,
    /// Field name
    pub name: String,
    /// Field descriptor
    pub descriptor: FieldType,
}

impl FieldRef {
    /// Create a field reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: FieldType) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.owner, self.name)
    }
}

/// A JVM instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // ===== Constants =====
    /// `iconst_m1` .. `iconst_5`
    Iconst(i8),
    /// Push a sign-extended byte
    Bipush(i8),
    /// Push a sign-extended short
    Sipush(i16),
    /// Push a constant pool entry (`ldc`, or `ldc_w` past index 255)
    Ldc(u16),
    /// Push null
    AconstNull,

    // ===== Locals =====
    /// `iload` / `aload` family
    Load { kind: ValueKind, slot: u16 },
    /// `istore` / `astore` family
    Store { kind: ValueKind, slot: u16 },

    // ===== Arithmetic =====
    /// int add
    Iadd,
    /// int subtract
    Isub,
    /// int multiply
    Imul,
    /// int divide
    Idiv,
    /// int remainder
    Irem,
    /// bitwise and
    Iand,
    /// bitwise or
    Ior,
    /// bitwise xor
    Ixor,
    /// int negate
    Ineg,

    // ===== Stack =====
    /// Duplicate the top value
    Dup,

    // ===== Control flow =====
    /// Compare the top int against zero and branch
    If { cond: Condition, target: LabelId },
    /// Compare two ints and branch
    IfIcmp { cond: Condition, target: LabelId },
    /// Compare two references and branch (`Eq`/`Ne` only)
    IfAcmp { cond: Condition, target: LabelId },
    /// Unconditional branch
    Goto(LabelId),
    /// `return`, `ireturn` or `areturn`
    Return(Option<ValueKind>),

    // ===== Objects =====
    /// Allocate an uninitialised instance
    New(String),
    /// Read an instance field
    GetField(FieldRef),
    /// Write an instance field
    PutField(FieldRef),
    /// Virtual dispatch
    InvokeVirtual(MethodRef),
    /// Constructor and super calls
    InvokeSpecial(MethodRef),
    /// Static call
    InvokeStatic(MethodRef),
}

impl Instruction {
    /// Load the value in `slot`
    pub fn load(kind: ValueKind, slot: u16) -> Self {
        Instruction::Load { kind, slot }
    }

    /// Store the top value into `slot`
    pub fn store(kind: ValueKind, slot: u16) -> Self {
        Instruction::Store { kind, slot }
    }

    /// Narrowest instruction pushing `value`, when one exists without a
    /// constant pool entry
    pub fn push_int(value: i32) -> Option<Self> {
        if (-1..=5).contains(&value) {
            Some(Instruction::Iconst(value as i8))
        } else if let Ok(byte) = i8::try_from(value) {
            Some(Instruction::Bipush(byte))
        } else if let Ok(short) = i16::try_from(value) {
            Some(Instruction::Sipush(short))
        } else {
            None
        }
    }

    /// Jasmin mnemonic
    pub fn mnemonic(&self) -> String {
        match self {
            Instruction::Iconst(-1) => "iconst_m1".to_string(),
            Instruction::Iconst(v) => format!("iconst_{}", v),
            Instruction::Bipush(_) => "bipush".to_string(),
            Instruction::Sipush(_) => "sipush".to_string(),
            Instruction::Ldc(index) if *index > u8::MAX as u16 => "ldc_w".to_string(),
            Instruction::Ldc(_) => "ldc".to_string(),
            Instruction::AconstNull => "aconst_null".to_string(),
            Instruction::Load { kind, slot } if *slot <= 3 => format!("{}load_{}", kind.prefix(), slot),
            Instruction::Load { kind, .. } => format!("{}load", kind.prefix()),
            Instruction::Store { kind, slot } if *slot <= 3 => format!("{}store_{}", kind.prefix(), slot),
            Instruction::Store { kind, .. } => format!("{}store", kind.prefix()),
            Instruction::Iadd => "iadd".to_string(),
            Instruction::Isub => "isub".to_string(),
            Instruction::Imul => "imul".to_string(),
            Instruction::Idiv => "idiv".to_string(),
            Instruction::Irem => "irem".to_string(),
            Instruction::Iand => "iand".to_string(),
            Instruction::Ior => "ior".to_string(),
            Instruction::Ixor => "ixor".to_string(),
            Instruction::Ineg => "ineg".to_string(),
            Instruction::Dup => "dup".to_string(),
            Instruction::If { cond, .. } => format!("if{}", cond.suffix()),
            Instruction::IfIcmp { cond, .. } => format!("if_icmp{}", cond.suffix()),
            Instruction::IfAcmp { cond, .. } => format!("if_acmp{}", cond.suffix()),
            Instruction::Goto(_) => "goto".to_string(),
            Instruction::Return(None) => "return".to_string(),
            Instruction::Return(Some(kind)) => format!("{}return", kind.prefix()),
            Instruction::New(_) => "new".to_string(),
            Instruction::GetField(_) => "getfield".to_string(),
            Instruction::PutField(_) => "putfield".to_string(),
            Instruction::InvokeVirtual(_) => "invokevirtual".to_string(),
            Instruction::InvokeSpecial(_) => "invokespecial".to_string(),
            Instruction::InvokeStatic(_) => "invokestatic".to_string(),
        }
    }

    /// Encoded size in bytes
    pub fn size(&self) -> u32 {
        match self {
            Instruction::Bipush(_) => 2,
            Instruction::Sipush(_) => 3,
            Instruction::Ldc(index) if *index > u8::MAX as u16 => 3,
            Instruction::Ldc(_) => 2,
            Instruction::Load { slot, .. } | Instruction::Store { slot, .. } => match slot {
                0..=3 => 1,
                4..=255 => 2,
                // wide prefix + opcode + u16 index
                _ => 4,
            },
            Instruction::If { .. }
            | Instruction::IfIcmp { .. }
            | Instruction::IfAcmp { .. }
            | Instruction::Goto(_)
            | Instruction::New(_)
            | Instruction::GetField(_)
            | Instruction::PutField(_)
            | Instruction::InvokeVirtual(_)
            | Instruction::InvokeSpecial(_)
            | Instruction::InvokeStatic(_) => 3,
            _ => 1,
        }
    }

    /// Operand stack effect as (values popped, values pushed)
    pub fn stack_effect(&self) -> (u16, u16) {
        match self {
            Instruction::Iconst(_)
            | Instruction::Bipush(_)
            | Instruction::Sipush(_)
            | Instruction::Ldc(_)
            | Instruction::AconstNull
            | Instruction::Load { .. }
            | Instruction::New(_) => (0, 1),
            Instruction::Store { .. } => (1, 0),
            Instruction::Iadd
            | Instruction::Isub
            | Instruction::Imul
            | Instruction::Idiv
            | Instruction::Irem
            | Instruction::Iand
            | Instruction::Ior
            | Instruction::Ixor => (2, 1),
            Instruction::Ineg => (1, 1),
            Instruction::Dup => (1, 2),
            Instruction::If { .. } => (1, 0),
            Instruction::IfIcmp { .. } | Instruction::IfAcmp { .. } => (2, 0),
            Instruction::Goto(_) => (0, 0),
            Instruction::Return(None) => (0, 0),
            Instruction::Return(Some(_)) => (1, 0),
            Instruction::GetField(_) => (1, 1),
            Instruction::PutField(_) => (2, 0),
            Instruction::InvokeVirtual(method) | Instruction::InvokeSpecial(method) => {
                invoke_effect(method, true)
            }
            Instruction::InvokeStatic(method) => invoke_effect(method, false),
        }
    }

    /// Branch target, if this instruction can jump
    pub fn branch_target(&self) -> Option<LabelId> {
        match self {
            Instruction::If { target, .. }
            | Instruction::IfIcmp { target, .. }
            | Instruction::IfAcmp { target, .. }
            | Instruction::Goto(target) => Some(*target),
            _ => None,
        }
    }

    /// Whether control never falls through to the next instruction
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Goto(_) | Instruction::Return(_))
    }

    /// Whether this is one of the return instructions
    pub fn is_return(&self) -> bool {
        matches!(self, Instruction::Return(_))
    }

    /// Local slot read or written, if any
    pub fn local_slot(&self) -> Option<u16> {
        match self {
            Instruction::Load { slot, .. } | Instruction::Store { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

fn invoke_effect(method: &MethodRef, has_receiver: bool) -> (u16, u16) {
    let pops = method.descriptor.params.len() as u16 + u16::from(has_receiver);
    let pushes = u16::from(!method.descriptor.is_void());
    (pops, pushes)
}
