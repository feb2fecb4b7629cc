//! S-expression formatter for AST nodes.
//!
//! Unlike the canonical `Display` rendering, the S-expression form names
//! every node, so two trees that render to the same source text but differ
//! in shape (an identifier vs. a keyword spelling, say) are distinguishable.
//!
//! ```text
//! let x = -a + 1;   →   (let x (infix + (prefix - (ident a)) (int 1)))
//! ```

use super::types::{Expression, Program, Statement};

/// Format a program, one statement per line.
pub fn format_program(program: &Program) -> String {
    program
        .statements
        .iter()
        .map(format_statement)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_statement(statement: &Statement) -> String {
    match statement {
        Statement::Let(s) => format!("(let {} {})", s.name.value, format_expr(&s.value)),
        Statement::Return(s) => format!("(return {})", format_expr(&s.value)),
        Statement::Expression(s) => format!("(expr {})", format_expr(&s.expression)),
    }
}

pub fn format_expr(expr: &Expression) -> String {
    match expr {
        Expression::Identifier(e) => format!("(ident {})", e.value),
        Expression::Integer(e) => format!("(int {})", e.value),
        Expression::Boolean(e) => format!("(bool {})", e.value),
        Expression::Prefix(e) => format!("(prefix {} {})", e.operator, format_expr(&e.right)),
        Expression::Infix(e) => format!(
            "(infix {} {} {})",
            e.operator,
            format_expr(&e.left),
            format_expr(&e.right)
        ),
    }
}
