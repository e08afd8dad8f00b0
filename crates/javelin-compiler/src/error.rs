//! Compilation errors

use crate::ir::Opcode;
use javelin_bytecode::{PoolOverflow, VerifyError};
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Missing static type on {construct}")]
    MissingType { construct: String },

    #[error("Unknown operator `{op}`")]
    UnknownOperator { op: String },

    #[error("No descriptor for {owner}.{member}")]
    MissingDescriptor { owner: String, member: String },

    #[error("Unsupported type: {name}")]
    UnsupportedType { name: String },

    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },

    #[error("Invalid assignment target: {target}")]
    InvalidAssignmentTarget { target: String },

    #[error("Literal `{text}` does not fit type {ty}")]
    InvalidLiteral { text: String, ty: String },

    #[error("Use of unknown local `{name}`")]
    UnknownLocal { name: String },

    #[error("Label {label} is referenced but never defined")]
    UnboundLabel { label: String },

    #[error("Label {label} is defined more than once")]
    DuplicateLabel { label: String },

    #[error("`this` must be the first declared parameter")]
    ThisNotFirst,

    #[error("Parameter `{name}` declared twice")]
    DuplicateParameter { name: String },

    #[error("{opcode} outside of a method body")]
    InstructionOutsideMethod { opcode: Opcode },

    #[error("Method {name} starts before the previous method ended")]
    NestedMethod { name: String },

    #[error("FUNC_EXIT for {name} without a matching FUNC_ENTRY")]
    UnmatchedExit { name: String },

    #[error("Method {name} is never closed")]
    UnterminatedMethod { name: String },

    #[error("Method needs more than {limit} local variable slots")]
    TooManyLocals { limit: usize },

    #[error(transparent)]
    ConstantPoolOverflow(#[from] PoolOverflow),

    #[error("Cannot compare references with {op}")]
    InvalidReferenceComparison { op: Opcode },

    #[error("In {class}.{method}: {source}")]
    InMethod {
        class: String,
        method: String,
        #[source]
        source: Box<CompileError>,
    },

    #[error("Bytecode verification failed: {0}")]
    Verification(#[from] VerifyError),

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompileError {
    /// Attach class/method context, keeping the innermost context if one
    /// is already present
    pub fn in_method(self, class: impl Into<String>, method: impl Into<String>) -> Self {
        match self {
            CompileError::InMethod { .. } => self,
            other => CompileError::InMethod {
                class: class.into(),
                method: method.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without any method context
    pub fn root(&self) -> &CompileError {
        match self {
            CompileError::InMethod { source, .. } => source.root(),
            other => other,
        }
    }
}
