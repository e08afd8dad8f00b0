//! Javelin Compiler - Typed AST to TAC to JVM Class Units
//!
//! The pipeline has two stages that can be driven separately:
//!
//! 1. [`lower::Lowerer`] flattens a typed [`ast::Program`] into a single
//!    three-address code stream.
//! 2. [`codegen::CodeGenerator`] splits that stream by class and selects
//!    JVM stack instructions for every method.
//!
//! [`Compiler`] runs both, plus the bytecode verifier when enabled.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;
pub mod options;
pub mod signature;

pub use codegen::CodeGenerator;
pub use error::{CompileError, CompileResult};
pub use ir::{Instr, PrettyPrint};
pub use lower::Lowerer;
pub use options::CompilerOptions;
pub use signature::SignatureTable;

// Re-export output types for convenience
pub use javelin_bytecode::{verify_class, ClassFile, MethodDef, VerifyError};

use ast::Program;
use log::info;

/// Main compiler entry point
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Lower a program to TAC
    pub fn lower(&self, program: &Program) -> CompileResult<Vec<Instr>> {
        let signatures = SignatureTable::build(program, &self.options.main_class, &self.options.entry_point)?;
        Lowerer::new(&signatures).lower_program(program)
    }

    /// Generate class units from a TAC stream
    pub fn generate(&self, instrs: &[Instr]) -> CompileResult<Vec<ClassFile>> {
        let classes = CodeGenerator::new(&self.options).generate(instrs)?;
        if self.options.verify {
            for class in &classes {
                verify_class(class)?;
            }
        }
        Ok(classes)
    }

    /// Compile a program to class units
    pub fn compile(&self, program: &Program) -> CompileResult<Vec<ClassFile>> {
        let instrs = self.lower(program)?;
        let classes = self.generate(&instrs)?;
        info!(
            "compiled {} TAC instructions into {} classes",
            instrs.len(),
            classes.len()
        );
        Ok(classes)
    }
}
