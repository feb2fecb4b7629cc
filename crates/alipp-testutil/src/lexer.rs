//! Lexer test file parser and runner.
//!
//! Each non-comment line of `tokens.txt` is one case:
//!
//! ```text
//! let x = 5;  ⇒  LET IDENT(x) ASSIGN INT(5) SEMICOLON
//! ```
//!
//! Tokens are written by kind name; identifiers, integers and illegal
//! characters also carry their text. The trailing EOF is implied and checked.
//!
//! The input is everything before `⇒` minus the trailing spaces that pad the
//! separator; leading whitespace and tabs reach the lexer as written. Write
//! `\s`, `\t`, `\r`, `\n` and `\\` for a space, tab, carriage return,
//! newline and backslash.

use alipp_kernel::lexer::Lexer;
use alipp_kernel::{Dialect, Token, TokenKind};

use crate::{TestResult, TestSummary, dialect_directive};

/// Separator between input and expected tokens.
pub const ARROW: &str = "⇒";

/// A single lexer test case.
#[derive(Debug, Clone, PartialEq)]
pub struct LexerTestCase {
    /// Line number in the test file (1-indexed).
    pub line: usize,
    pub input: String,
    /// Expected tokens, space separated, EOF excluded.
    pub expected: String,
    pub dialect: Dialect,
}

/// Format a token the way the test file writes it.
pub fn format_token(token: &Token) -> String {
    match token.kind {
        TokenKind::Ident | TokenKind::Int | TokenKind::Illegal => {
            format!("{}({})", token.kind.name(), token.text)
        }
        kind => kind.name().to_string(),
    }
}

/// Parse `tokens.txt` into test cases. A malformed line (missing separator,
/// unknown token kind, bad dialect directive) comes back as `Err((line, message))`
/// and is reported as a [`TestResult::Error`] by [`run_lexer_tests`].
pub fn parse_lexer_tests(content: &str) -> Vec<Result<LexerTestCase, (usize, String)>> {
    let mut dialect = Dialect::default();
    let mut cases = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;

        if let Some(directive) = dialect_directive(raw) {
            match directive {
                Ok(d) => dialect = d,
                Err(message) => cases.push(Err((line, message))),
            }
            continue;
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((input, expected)) = raw.split_once(ARROW) else {
            cases.push(Err((line, format!("missing '{ARROW}' separator"))));
            continue;
        };
        let expected: Vec<_> = expected.split_whitespace().collect();
        if let Some(unknown) = expected
            .iter()
            .map(|word| kind_name(word))
            .find(|name| TokenKind::from_name(name).is_none())
        {
            cases.push(Err((line, format!("unknown token kind '{unknown}'"))));
            continue;
        }

        cases.push(Ok(LexerTestCase {
            line,
            input: unescape(input.trim_end_matches(' ')),
            expected: expected.join(" "),
            dialect,
        }));
    }

    cases
}

/// `IDENT(x)` is kind `IDENT`.
fn kind_name(word: &str) -> &str {
    word.split_once('(').map_or(word, |(name, _)| name)
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl LexerTestCase {
    /// Run this test case and return the result.
    pub fn run(&self) -> TestResult {
        let mut lexer = Lexer::with_keywords(&self.input, self.dialect.keywords());
        let actual = lexer
            .by_ref()
            .map(|token| format_token(&token))
            .collect::<Vec<_>>()
            .join(" ");

        // The lexer must stay at EOF once it got there.
        if !lexer.next_token().is(TokenKind::Eof) {
            return TestResult::Error {
                message: "lexer produced a token after EOF".to_string(),
            };
        }

        TestResult::compare(&self.expected, &actual)
    }
}

/// Run all lexer test cases and return a summary.
pub fn run_lexer_tests(cases: &[Result<LexerTestCase, (usize, String)>]) -> TestSummary {
    let mut summary = TestSummary::new();

    for case in cases {
        match case {
            Ok(case) => summary.record(&case.input, case.line, case.run()),
            Err((line, message)) => summary.record(
                "<malformed>",
                *line,
                TestResult::Error {
                    message: message.clone(),
                },
            ),
        }
    }

    summary
}
