//! Statement AST nodes

use super::expression::Expression;

/// Statement (performs an action)
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Local variable declaration: int x = 1;
    VariableDecl(VariableDecl),

    /// Expression statement: f(x);
    Expression(ExpressionStatement),

    /// If statement
    If(IfStatement),

    /// While loop
    While(WhileStatement),

    /// For loop
    For(ForStatement),

    /// Return statement
    Return(ReturnStatement),

    /// Block: { ... }
    Block(BlockStatement),
}

impl Statement {
    pub fn var(ty: impl Into<String>, name: impl Into<String>, initializer: Option<Expression>) -> Self {
        Statement::VariableDecl(VariableDecl {
            ty: ty.into(),
            name: name.into(),
            initializer,
        })
    }

    pub fn expr(expression: Expression) -> Self {
        Statement::Expression(ExpressionStatement { expression })
    }

    pub fn if_else(condition: Expression, then_branch: Statement, else_branch: Option<Statement>) -> Self {
        Statement::If(IfStatement {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn while_loop(condition: Expression, body: Statement) -> Self {
        Statement::While(WhileStatement {
            condition,
            body: Box::new(body),
        })
    }

    pub fn for_loop(
        init: Option<Statement>,
        condition: Option<Expression>,
        update: Option<Expression>,
        body: Statement,
    ) -> Self {
        Statement::For(ForStatement {
            init: init.map(Box::new),
            condition,
            update,
            body: Box::new(body),
        })
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Statement::Return(ReturnStatement { value })
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block(BlockStatement { statements })
    }
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub ty: String,
    pub name: String,
    pub initializer: Option<Expression>,
}

/// Expression statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// If statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

/// While loop
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
}

/// For loop: for (init; condition; update) body
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

/// Return statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
}

/// Block statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl BlockStatement {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}
