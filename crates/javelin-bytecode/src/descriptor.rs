//! JVM type descriptors
//!
//! Field descriptors (`I`, `Z`, `Ljava/lang/String;`, `[I`) and method
//! descriptors (`(II)V`) in both structured and textual form.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Internal name of `java.lang.String`
pub const STRING_CLASS: &str = "java/lang/String";

/// Internal name of `java.lang.Object`
pub const OBJECT_CLASS: &str = "java/lang/Object";

/// Descriptor parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Input ended in the middle of a descriptor
    #[error("Unexpected end of descriptor `{0}`")]
    UnexpectedEnd(String),

    /// A character that starts no known descriptor
    #[error("Invalid descriptor character `{found}` in `{input}`")]
    InvalidChar { found: char, input: String },

    /// Trailing input after a complete descriptor
    #[error("Trailing characters in descriptor `{0}`")]
    Trailing(String),
}

/// Whether a value occupies a slot as a primitive or as a reference.
///
/// Decides between the `i`-prefixed and `a`-prefixed load, store and
/// return instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// int or boolean
    Primitive,
    /// Object, string, array or null
    Reference,
}

impl ValueKind {
    /// Instruction prefix used by the JVM (`i` or `a`)
    pub fn prefix(self) -> char {
        match self {
            ValueKind::Primitive => 'i',
            ValueKind::Reference => 'a',
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Primitive => write!(f, "primitive"),
            ValueKind::Reference => write!(f, "reference"),
        }
    }
}

/// A field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `I`
    Int,
    /// `Z`
    Boolean,
    /// `L<internal name>;`
    Object(String),
    /// `[<component>`
    Array(Box<FieldType>),
}

impl FieldType {
    /// `Ljava/lang/String;`
    pub fn string() -> Self {
        FieldType::Object(STRING_CLASS.to_string())
    }

    /// `L<class>;`
    pub fn object(class: impl Into<String>) -> Self {
        FieldType::Object(class.into())
    }

    /// Slot kind of values of this type
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldType::Int | FieldType::Boolean => ValueKind::Primitive,
            FieldType::Object(_) | FieldType::Array(_) => ValueKind::Reference,
        }
    }

    /// Class name for object types
    pub fn class_name(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }

    fn parse_from(input: &str, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Self, DescriptorError> {
        match chars.next() {
            Some('I') => Ok(FieldType::Int),
            Some('Z') => Ok(FieldType::Boolean),
            Some('[') => Ok(FieldType::Array(Box::new(Self::parse_from(input, chars)?))),
            Some('L') => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(';') if !name.is_empty() => return Ok(FieldType::Object(name)),
                        Some(';') => {
                            return Err(DescriptorError::InvalidChar {
                                found: ';',
                                input: input.to_string(),
                            })
                        }
                        Some(c) => name.push(c),
                        None => return Err(DescriptorError::UnexpectedEnd(input.to_string())),
                    }
                }
            }
            Some(found) => Err(DescriptorError::InvalidChar {
                found,
                input: input.to_string(),
            }),
            None => Err(DescriptorError::UnexpectedEnd(input.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => write!(f, "I"),
            FieldType::Boolean => write!(f, "Z"),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(component) => write!(f, "[{}", component),
        }
    }
}

impl FromStr for FieldType {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars().peekable();
        let ty = Self::parse_from(s, &mut chars)?;
        if chars.next().is_some() {
            return Err(DescriptorError::Trailing(s.to_string()));
        }
        Ok(ty)
    }
}

/// A method descriptor: parameter types and an optional return type
/// (`None` is `V`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub params: Vec<FieldType>,
    /// Return type, `None` for void
    pub ret: Option<FieldType>,
}

impl MethodDescriptor {
    /// Create a descriptor
    pub fn new(params: Vec<FieldType>, ret: Option<FieldType>) -> Self {
        Self { params, ret }
    }

    /// `()V`
    pub fn void() -> Self {
        Self::new(Vec::new(), None)
    }

    /// `([Ljava/lang/String;)V`, the signature of a program entry point
    pub fn main() -> Self {
        Self::new(vec![FieldType::Array(Box::new(FieldType::string()))], None)
    }

    /// Whether the method returns nothing
    pub fn is_void(&self) -> bool {
        self.ret.is_none()
    }

    /// Kind of the returned value, if any
    pub fn return_kind(&self) -> Option<ValueKind> {
        self.ret.as_ref().map(FieldType::kind)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for param in &self.params {
            write!(f, "{}", param)?;
        }
        write!(f, ")")?;
        match &self.ret {
            Some(ret) => write!(f, "{}", ret),
            None => write!(f, "V"),
        }
    }
}

impl FromStr for MethodDescriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars().peekable();
        match chars.next() {
            Some('(') => {}
            Some(found) => {
                return Err(DescriptorError::InvalidChar {
                    found,
                    input: s.to_string(),
                })
            }
            None => return Err(DescriptorError::UnexpectedEnd(s.to_string())),
        }

        let mut params = Vec::new();
        loop {
            match chars.peek() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some(_) => params.push(FieldType::parse_from(s, &mut chars)?),
                None => return Err(DescriptorError::UnexpectedEnd(s.to_string())),
            }
        }

        let ret = if chars.peek() == Some(&'V') {
            chars.next();
            None
        } else {
            Some(FieldType::parse_from(s, &mut chars)?)
        };

        if chars.next().is_some() {
            return Err(DescriptorError::Trailing(s.to_string()));
        }
        Ok(Self { params, ret })
    }
}
