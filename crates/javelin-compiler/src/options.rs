//! Compiler configuration

use crate::error::{CompileError, CompileResult};
use javelin_bytecode::OBJECT_CLASS;
use serde::{Deserialize, Serialize};

/// Options controlling IR generation and code generation.
///
/// Missing keys fall back to their defaults when deserialising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Class that receives top-level functions
    pub main_class: String,
    /// Top-level function emitted as `public static main([Ljava/lang/String;)V`
    pub entry_point: String,
    /// Super class of every generated class
    pub super_class: String,
    /// Run the bytecode verifier over generated classes
    pub verify: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            main_class: "Main".to_string(),
            entry_point: "main".to_string(),
            super_class: OBJECT_CLASS.to_string(),
            verify: true,
        }
    }
}

impl CompilerOptions {
    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> CompileResult<Self> {
        serde_json::from_str(json).map_err(|e| CompileError::Config {
            message: e.to_string(),
        })
    }

    /// Serialize options to pretty-printed JSON
    pub fn to_json(&self) -> CompileResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompileError::Config {
            message: e.to_string(),
        })
    }

    pub fn with_main_class(mut self, name: impl Into<String>) -> Self {
        self.main_class = name.into();
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
