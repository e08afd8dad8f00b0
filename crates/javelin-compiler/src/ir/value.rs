//! IR operands: temporaries, labels, named locals and constants

use javelin_bytecode::ValueKind;
use std::fmt;

/// Compiler-generated single-assignment temporary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub u32);

impl Temp {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Jump target, unique within a compilation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl Label {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Name of the implicit receiver
pub const THIS: &str = "this";

/// A value source or destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Temporary
    Temp(Temp),
    /// Named local, parameter or `this`
    Local(String),
}

impl Operand {
    pub fn local(name: impl Into<String>) -> Self {
        Operand::Local(name.into())
    }

    pub fn this() -> Self {
        Operand::Local(THIS.to_string())
    }

    pub fn is_this(&self) -> bool {
        matches!(self, Operand::Local(name) if name == THIS)
    }
}

impl From<Temp> for Operand {
    fn from(temp: Temp) -> Self {
        Operand::Temp(temp)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Temp(t) => write!(f, "{}", t),
            Operand::Local(name) => write!(f, "{}", name),
        }
    }
}

/// Constant value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// 32-bit integer
    Int(i32),
    /// Boolean
    Bool(bool),
    /// String
    Str(String),
    /// Null reference
    Null,
}

impl Constant {
    pub fn kind(&self) -> ValueKind {
        match self {
            Constant::Int(_) | Constant::Bool(_) => ValueKind::Primitive,
            Constant::Str(_) | Constant::Null => ValueKind::Reference,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Str(s) => write!(f, "{:?}", s),
            Constant::Null => write!(f, "null"),
        }
    }
}
