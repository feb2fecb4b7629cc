//! Parser for alipp source code.
//!
//! Pulls tokens from a [`Lexer`] one at a time, keeping exactly one token of
//! lookahead, and builds a [`Program`]. Expressions are parsed with a Pratt
//! (top-down operator precedence) engine: every token kind may have a prefix
//! rule (it can start an expression) and an infix rule (it can continue one),
//! and a precedence table decides how far an infix operator reaches.
//!
//! Syntax errors never abort the parse. They are collected in order and the
//! statement that produced them is dropped, so one pass reports everything.
//!
//! # Precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | `Equals` | `==` `!=` |
//! | `LessGreater` | `<` `>` |
//! | `Sum` | `+` `-` |
//! | `Product` | `*` `/` |
//! | `Prefix` | unary `-` `!` |
//! | `Call` | `(` (reserved, no call expressions yet) |
//!
//! Nesting through prefix operators and parentheses is capped at
//! [`MAX_NESTING_DEPTH`]; deeper input is reported as
//! [`ParseError::NestingTooDeep`] instead of exhausting the stack.

use thiserror::Error;

use crate::ast::{
    BooleanLiteral, Expression, ExpressionStatement, Identifier, InfixExpression, IntegerLiteral,
    LetStatement, PrefixExpression, Program, ReturnStatement, Statement,
};
use crate::keywords::KeywordTable;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// A recoverable syntax error. `Display` is the diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A mandatory token was missing.
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    /// The current token cannot start an expression.
    #[error("no prefix parse function for {0} found")]
    NoPrefixRule(TokenKind),
    /// An integer literal does not fit in an `i64`.
    #[error("wasn't able to parse {0:?} as integer")]
    InvalidInteger(String),
    /// Expressions nested past [`MAX_NESTING_DEPTH`].
    #[error("expression nested more than {0} levels deep")]
    NestingTooDeep(usize),
}

/// Deepest expression nesting the parser accepts. Every prefix operator,
/// parenthesis and folded infix operator counts one level, so no tree is
/// taller than this.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Binding strength of an operator. Variant order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Precedence of `kind` in infix position. Kinds that never continue an
    /// expression bind at [`Precedence::Lowest`].
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Whether `kind` has an infix rule (a binary operator).
fn has_infix_rule(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
    )
}

/// Pratt parser over a single lexer.
#[derive(Debug)]
pub struct Parser<'k> {
    lexer: Lexer<'k>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    depth: usize,
}

impl<'k> Parser<'k> {
    pub fn new(lexer: Lexer<'k>) -> Self {
        let mut parser = Self {
            lexer,
            current: Token::eof(),
            peek: Token::eof(),
            errors: Vec::new(),
            depth: 0,
        };
        // Prime both `current` and `peek`.
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Diagnostics collected so far, in detection order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse statements until EOF. Statements that failed to parse are absent;
    /// check [`errors`](Self::errors) before trusting the result.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }

        tracing::trace!(
            statements = program.statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }

    fn next_token(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    /// Advance if `peek` is `kind`, otherwise record an error and stay put.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.error(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek.kind,
            });
            false
        }
    }

    fn error(&mut self, error: ParseError) {
        tracing::debug!(%error, "parse error");
        self.errors.push(error);
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.current.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let token = self.current.clone();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(ReturnStatement { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(ExpressionStatement { expression })
    }

    /// The Pratt loop. Infix operators are folded into `left` for as long as
    /// the lookahead binds tighter than `precedence`; passing an operator's own
    /// precedence to its right operand makes equal levels associate left.
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let saved = self.depth;
        let expression = self.parse_expression_at_depth(precedence);
        self.depth = saved;
        expression
    }

    fn parse_expression_at_depth(&mut self, precedence: Precedence) -> Option<Expression> {
        self.enter_nesting()?;
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind) {
            if !has_infix_rule(self.peek.kind) {
                return Some(left);
            }
            // Each fold deepens the left spine of the tree.
            self.enter_nesting()?;
            self.next_token();
            left = self.parse_infix_expression(left)?;
        }

        Some(left)
    }

    /// Count one level of nesting, or report it and give up on the statement.
    fn enter_nesting(&mut self) -> Option<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error(ParseError::NestingTooDeep(MAX_NESTING_DEPTH));
            self.skip_statement();
            return None;
        }
        self.depth += 1;
        Some(())
    }

    /// Drop the rest of the statement so one over-deep statement yields one
    /// diagnostic. Stops on the `;` (or EOF) for `parse_program` to step past.
    fn skip_statement(&mut self) {
        while !self.current.is(TokenKind::Semicolon) && !self.current.is(TokenKind::Eof) {
            self.next_token();
        }
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier::new(self.current.clone()))),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(BooleanLiteral {
                token: self.current.clone(),
                value: self.current.is(TokenKind::True),
            })),
            TokenKind::Exclamation | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            kind => {
                self.error(ParseError::NoPrefixRule(kind));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.text.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral {
                token: self.current.clone(),
                value,
            })),
            Err(_) => {
                self.error(ParseError::InvalidInteger(self.current.text.clone()));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix(PrefixExpression {
            operator: token.text.clone(),
            token,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let precedence = Precedence::of(token.kind);
        self.next_token();

        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(InfixExpression {
            operator: token.text.clone(),
            token,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// `( expr )` only overrides precedence; it leaves no node behind.
    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }

        Some(expression)
    }
}

/// Parse alipp source code (English keywords) into a Program AST.
pub fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
    parse_with(source, KeywordTable::english())
}

/// Parse with a custom keyword table.
pub fn parse_with(source: &str, keywords: &KeywordTable) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::with_keywords(source, keywords));
    let program = parser.parse_program();
    let errors = parser.into_errors();

    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}
