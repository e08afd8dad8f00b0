//! Typed AST consumed by the IR generator
//!
//! The tree is produced and type-checked elsewhere; this module only
//! defines its shape.

pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

/// A whole compilation unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Class declarations in source order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Class(class) => Some(class),
            Item::Function(_) => None,
        })
    }

    /// Top-level functions in source order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(function) => Some(function),
            Item::Class(_) => None,
        })
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Class(ClassDecl),
    Function(FunctionDecl),
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FunctionDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>, methods: Vec<FunctionDecl>) -> Self {
        Self {
            name: name.into(),
            fields,
            methods,
        }
    }

    /// Whether `method` is this class's constructor
    pub fn is_constructor(&self, method: &FunctionDecl) -> bool {
        method.name == self.name
    }
}

/// Field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: String,
    pub name: String,
    pub initializer: Option<Expression>,
}

impl FieldDecl {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            initializer: None,
        }
    }
}

/// Function or method declaration. A method named after its class is
/// the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: BlockStatement,
}

impl FunctionDecl {
    pub fn new(
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<Parameter>,
        body: Vec<Statement>,
    ) -> Self {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            params,
            body: BlockStatement::new(body),
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}
