//! Expression AST nodes
//!
//! Every expression carries the static type resolved by the checker in
//! its `ty` field (`"int"`, `"boolean"`, `"String"`, a class name, ...).
//! `None` means the checker never annotated the node.

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal: 42
    IntLiteral(IntLiteral),

    /// Boolean literal: true, false
    BooleanLiteral(BooleanLiteral),

    /// String literal: "hello"
    StringLiteral(StringLiteral),

    /// Null literal
    NullLiteral(NullLiteral),

    /// Identifier, including `this`
    Identifier(Identifier),

    /// Binary operation: a + b
    Binary(BinaryExpression),

    /// Unary operation: !a, -a, and postfix a++, a--
    Unary(UnaryExpression),

    /// Assignment: a = b, this.x = b
    Assignment(AssignmentExpression),

    /// Object creation: new Point(1, 2)
    New(NewExpression),

    /// Method call: obj.m(a), m(a)
    Call(CallExpression),

    /// Field access: obj.x
    Member(MemberExpression),
}

impl Expression {
    /// Resolved static type
    pub fn ty(&self) -> Option<&str> {
        let ty = match self {
            Expression::IntLiteral(e) => &e.ty,
            Expression::BooleanLiteral(e) => &e.ty,
            Expression::StringLiteral(e) => &e.ty,
            Expression::NullLiteral(e) => &e.ty,
            Expression::Identifier(e) => &e.ty,
            Expression::Binary(e) => &e.ty,
            Expression::Unary(e) => &e.ty,
            Expression::Assignment(e) => &e.ty,
            Expression::New(e) => &e.ty,
            Expression::Call(e) => &e.ty,
            Expression::Member(e) => &e.ty,
        };
        ty.as_deref()
    }

    /// Short name of the node kind, used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Expression::IntLiteral(e) => format!("literal {}", e.value),
            Expression::BooleanLiteral(e) => format!("literal {}", e.value),
            Expression::StringLiteral(e) => format!("literal {:?}", e.value),
            Expression::NullLiteral(_) => "literal null".to_string(),
            Expression::Identifier(e) => format!("identifier `{}`", e.name),
            Expression::Binary(e) => format!("binary `{}`", e.operator),
            Expression::Unary(e) => format!("unary `{}`", e.operator),
            Expression::Assignment(_) => "assignment".to_string(),
            Expression::New(e) => format!("new {}", e.class),
            Expression::Call(e) => format!("call to `{}`", e.method),
            Expression::Member(e) => format!("field access `.{}`", e.property),
        }
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntLiteral(_)
                | Expression::BooleanLiteral(_)
                | Expression::StringLiteral(_)
                | Expression::NullLiteral(_)
        )
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    pub fn int(value: i64) -> Self {
        Expression::IntLiteral(IntLiteral {
            value,
            ty: Some("int".to_string()),
        })
    }

    pub fn boolean(value: bool) -> Self {
        Expression::BooleanLiteral(BooleanLiteral {
            value,
            ty: Some("boolean".to_string()),
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral(StringLiteral {
            value: value.into(),
            ty: Some("String".to_string()),
        })
    }

    pub fn null() -> Self {
        Expression::NullLiteral(NullLiteral {
            ty: Some("null".to_string()),
        })
    }

    pub fn ident(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Expression::Identifier(Identifier {
            name: name.into(),
            ty: Some(ty.into()),
        })
    }

    /// `this` inside `class`
    pub fn this(class: impl Into<String>) -> Self {
        Self::ident("this", class)
    }

    pub fn binary(operator: impl Into<String>, left: Expression, right: Expression, ty: impl Into<String>) -> Self {
        Expression::Binary(BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
            ty: Some(ty.into()),
        })
    }

    pub fn unary(operator: impl Into<String>, operand: Expression, ty: impl Into<String>) -> Self {
        Expression::Unary(UnaryExpression {
            operator: operator.into(),
            operand: Box::new(operand),
            ty: Some(ty.into()),
        })
    }

    /// Assignment typed as its target
    pub fn assign(target: Expression, value: Expression) -> Self {
        let ty = target.ty().map(str::to_string);
        Expression::Assignment(AssignmentExpression {
            target: Box::new(target),
            value: Box::new(value),
            ty,
        })
    }

    pub fn new_object(class: impl Into<String>, arguments: Vec<Expression>) -> Self {
        let class = class.into();
        Expression::New(NewExpression {
            ty: Some(class.clone()),
            class,
            arguments,
        })
    }

    pub fn call(object: Option<Expression>, method: impl Into<String>, arguments: Vec<Expression>, ty: impl Into<String>) -> Self {
        Expression::Call(CallExpression {
            object: object.map(Box::new),
            method: method.into(),
            arguments,
            ty: Some(ty.into()),
        })
    }

    pub fn member(object: Expression, property: impl Into<String>, ty: impl Into<String>) -> Self {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property: property.into(),
            ty: Some(ty.into()),
        })
    }
}

// ============================================================================
// Literal Expressions
// ============================================================================

/// Integer literal: 42
#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i64,
    pub ty: Option<String>,
}

/// Boolean literal: true, false
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub ty: Option<String>,
}

/// String literal: "hello"
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub ty: Option<String>,
}

/// Null literal
#[derive(Debug, Clone, PartialEq)]
pub struct NullLiteral {
    pub ty: Option<String>,
}

/// Identifier: x, this
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub ty: Option<String>,
}

impl Identifier {
    pub fn is_this(&self) -> bool {
        self.name == "this"
    }
}

// ============================================================================
// Compound Expressions
// ============================================================================

/// Binary expression: left operator right
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub ty: Option<String>,
}

/// Unary expression. `++` and `--` are postfix.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: String,
    pub operand: Box<Expression>,
    pub ty: Option<String>,
}

/// Assignment expression: target = value
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
    pub ty: Option<String>,
}

/// Object creation: new Class(args)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub class: String,
    pub arguments: Vec<Expression>,
    pub ty: Option<String>,
}

/// Method call. A missing object means an unqualified call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub object: Option<Box<Expression>>,
    pub method: String,
    pub arguments: Vec<Expression>,
    pub ty: Option<String>,
}

/// Field access: object.property
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: String,
    pub ty: Option<String>,
}
