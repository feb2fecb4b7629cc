//! Abstract Syntax Tree types for alipp.
//!
//! Every node keeps the token that introduced it, so [`Node::token_literal`]
//! can report the exact source spelling (which may be a localized keyword).
//! `Display` renders the canonical form: infix and prefix expressions are fully
//! parenthesized, so re-parsing the rendering yields an equal tree.

use std::fmt;

use serde::Serialize;

use crate::token::Token;

/// Capabilities shared by every AST node.
pub trait Node: fmt::Display {
    /// The literal text of the token that defines this node.
    fn token_literal(&self) -> &str;
}

/// A complete program is a sequence of statements, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Node::token_literal)
            .unwrap_or("")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    /// Binding: `let x = value;`
    Let(LetStatement),
    /// `return value;`
    Return(ReturnStatement),
    /// A bare expression, optionally terminated by `;`
    Expression(ExpressionStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(s) => &s.token.text,
            Statement::Return(s) => &s.token.text,
            Statement::Expression(s) => s.expression.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{} {} = {};", s.token.text, s.name, s.value),
            Statement::Return(s) => write!(f, "{} {};", s.token.text, s.value),
            Statement::Expression(s) => write!(f, "{}", s.expression),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

/// Carries no token of its own: grouping parentheses would otherwise make the
/// statement's first token depend on how the expression was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    /// Unary operator applied to an operand: `-x`, `!x`
    Prefix(PrefixExpression),
    /// Binary operator: `a + b`
    Infix(InfixExpression),
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(e) => &e.token.text,
            Expression::Integer(e) => &e.token.text,
            Expression::Boolean(e) => &e.token.text,
            Expression::Prefix(e) => &e.token.text,
            Expression::Infix(e) => &e.token.text,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{e}"),
            Expression::Integer(e) => f.write_str(&e.token.text),
            Expression::Boolean(e) => f.write_str(&e.token.text),
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.text.clone();
        Self { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixExpression {
    /// The operator token.
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfixExpression {
    /// The operator token.
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}
