//! Abstract Syntax Tree types for alipp.
//!
//! This module provides:
//! - AST type definitions (`types` module, re-exported at this level)
//! - S-expression formatter for test fixtures and the REPL (`sexpr` module)

mod types;
pub mod sexpr;

pub use types::*;
