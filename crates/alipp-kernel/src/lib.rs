//! alipp-kernel: the front end of the alipp language.
//!
//! This crate provides:
//!
//! - **Tokens**: The closed token vocabulary (`token`)
//! - **Keywords**: English and Kyrgyz keyword tables, selectable per lexer (`keywords`)
//! - **Lexer**: A Unicode-aware hand-written scanner (`lexer`)
//! - **AST**: Node types, canonical rendering, S-expression formatting (`ast`)
//! - **Parser**: A Pratt parser that collects every syntax error (`parser`)
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Program
//! ```
//!
//! There is no evaluator: parsing ends the pipeline.

pub mod ast;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod token;

pub use keywords::{Dialect, KeywordTable};
pub use lexer::Lexer;
pub use parser::{parse, parse_with, MAX_NESTING_DEPTH, ParseError, Parser};
pub use token::{Token, TokenKind};
