//! Lexer for alipp source code.
//!
//! The lexer works over a pre-decoded sequence of Unicode scalar values, so a
//! Cyrillic letter is one unit of input exactly like an ASCII one. Tokens are
//! produced lazily by [`Lexer::next_token`]; once input is exhausted every
//! further call returns the EOF token.
//!
//! # Example
//!
//! ```
//! use alipp_kernel::lexer::Lexer;
//! use alipp_kernel::token::TokenKind;
//!
//! let kinds: Vec<_> = Lexer::new("let x = 5;").map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Let, TokenKind::Ident, TokenKind::Assign, TokenKind::Int, TokenKind::Semicolon]
//! );
//! ```

use crate::keywords::KeywordTable;
use crate::token::{Token, TokenKind};

/// Hand-written scanner with one character of lookahead.
#[derive(Debug, Clone)]
pub struct Lexer<'k> {
    input: Vec<char>,
    /// Index of `ch`.
    position: usize,
    /// Index of the next character to read.
    read_position: usize,
    /// Character under examination, `None` past the end of input.
    ch: Option<char>,
    keywords: &'k KeywordTable,
    /// Set once the iterator has handed out EOF.
    finished: bool,
}

impl Lexer<'static> {
    /// Lexer using the English keyword table.
    pub fn new(source: &str) -> Self {
        Lexer::with_keywords(source, KeywordTable::english())
    }
}

impl<'k> Lexer<'k> {
    pub fn with_keywords(source: &str, keywords: &'k KeywordTable) -> Self {
        let mut lexer = Self {
            input: source.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            keywords,
            finished: false,
        };
        lexer.read_char();
        lexer
    }

    /// Scan the next token. Returns EOF forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(ch) = self.ch else {
            tracing::trace!("scanned EOF");
            return Token::eof();
        };

        let token = match ch {
            '=' => self.one_or_two(TokenKind::Assign, TokenKind::Eq),
            '!' => self.one_or_two(TokenKind::Exclamation, TokenKind::NotEq),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Asterisk),
            '/' => self.single(TokenKind::Slash),
            '<' => self.single(TokenKind::Lt),
            '>' => self.single(TokenKind::Gt),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            c if is_letter(c) => {
                // The run loops leave the cursor on the first character after the token.
                let text = self.read_while(is_letter);
                let kind = self.keywords.lookup(&text);
                Token::new(kind, text)
            }
            c if is_digit(c) => Token::new(TokenKind::Int, self.read_while(is_digit)),
            _ => self.single(TokenKind::Illegal),
        };

        tracing::trace!(kind = token.kind.name(), text = %token.text, "scanned token");
        token
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        if self.read_position < self.input.len() {
            self.read_position += 1;
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let start = self.position;
        while self.ch.is_some_and(&accept) {
            self.read_char();
        }
        self.input[start..self.position].iter().collect()
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let text = self.ch.map(String::from).unwrap_or_default();
        self.read_char();
        Token::new(kind, text)
    }

    /// `=`/`==` and `!`/`!=`: a trailing `=` upgrades to the two-character kind.
    fn one_or_two(&mut self, one: TokenKind, two: TokenKind) -> Token {
        if self.peek_char() == Some('=') {
            let mut text = String::with_capacity(2);
            text.extend(self.ch);
            self.read_char();
            text.push('=');
            self.read_char();
            Token::new(two, text)
        } else {
            self.single(one)
        }
    }
}

/// Yields every token before EOF, then `None`.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.finished = true;
            None
        } else {
            Some(token)
        }
    }
}

/// Unicode letters and `_` start and continue identifiers. Digits do neither.
pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// ASCII decimal digits only; integer literals have no sign, radix or separators.
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Tokenize `source` with the English keywords, including the trailing EOF.
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with(source, KeywordTable::english())
}

/// Tokenize `source` with a custom keyword table, including the trailing EOF.
pub fn tokenize_with(source: &str, keywords: &KeywordTable) -> Vec<Token> {
    let mut tokens: Vec<Token> = Lexer::with_keywords(source, keywords).collect();
    tokens.push(Token::eof());
    tokens
}
