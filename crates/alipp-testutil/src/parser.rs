//! Parser test file parser and runner.
//!
//! Parses the `tests/parser/*.test` format and runs each case through the
//! alipp parser:
//!
//! ```text
//! # test: let_sum
//! # expect: ok
//! ---
//! let x = 1 + 2;
//! ---
//! (let x (infix + (int 1) (int 2)))
//! ===
//! ```
//!
//! With `# expect: error` the expected block lists the diagnostics, one per
//! line, in the order the parser reports them. Passing `ok` cases must also
//! survive a round trip: every statement's canonical rendering parses back to
//! an equal statement.
//!
//! An unknown `# dialect:` or `# expect:` value is a fixture error, reported
//! against its line like a malformed lexer case.

use alipp_kernel::ast::Statement;
use alipp_kernel::ast::sexpr::{format_program, format_statement};
use alipp_kernel::{Dialect, KeywordTable, ParseError, parse_with};

use crate::{TestResult, TestSummary, dialect_directive};

/// A single parser test case.
#[derive(Debug, Clone)]
pub struct ParserTestCase {
    /// Test name from the `# test: name` line.
    pub name: String,
    /// Line number where the test starts (1-indexed).
    pub line_number: usize,
    /// The input source code.
    pub input: String,
    /// What we expect from parsing.
    pub expected: ParserExpectation,
    /// Keyword set in effect for this case.
    pub dialect: Dialect,
}

/// What we expect from parsing an input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserExpectation {
    /// Expected AST as S-expression.
    Ok(String),
    /// Expected diagnostics, one per line.
    Error(String),
}

/// Parse the *.test file format into test cases. Malformed directives come
/// back as `Err((line, message))`.
pub fn parse_parser_tests(content: &str) -> Vec<Result<ParserTestCase, (usize, String)>> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut dialect = Dialect::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if let Some(directive) = dialect_directive(line) {
            match directive {
                Ok(d) => dialect = d,
                Err(message) => cases.push(Err((i + 1, message))),
            }
            i += 1;
            continue;
        }

        // Look for test header: # test: name
        let Some(name) = line.strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let start_line = i + 1;
        i += 1;

        // Optional expect line: # expect: ok | error
        let mut expect_ok = Ok(true);
        if let Some(expect) = lines.get(i).and_then(|l| l.trim().strip_prefix("# expect:")) {
            expect_ok = match expect.trim() {
                "ok" => Ok(true),
                "error" => Ok(false),
                other => Err((
                    i + 1,
                    format!("unknown expectation '{other}' (expected ok or error)"),
                )),
            };
            i += 1;
        }

        // Skip to first ---
        while i < lines.len() && lines[i].trim() != "---" {
            i += 1;
        }
        i += 1;

        // Collect input until next ---
        let mut input_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input_lines.push(lines[i]);
            i += 1;
        }
        i += 1;

        // Collect expected until ===
        let mut expected_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            expected_lines.push(lines[i].trim());
            i += 1;
        }
        i += 1;

        let expected = expected_lines.join("\n").trim().to_string();
        cases.push(expect_ok.map(|ok| ParserTestCase {
            name,
            line_number: start_line,
            input: input_lines.join("\n"),
            expected: if ok {
                ParserExpectation::Ok(expected)
            } else {
                ParserExpectation::Error(expected)
            },
            dialect,
        }));
    }

    cases
}

impl ParserTestCase {
    /// Run this test case and return the result.
    pub fn run(&self) -> TestResult {
        let keywords = self.dialect.keywords();

        match (parse_with(&self.input, keywords), &self.expected) {
            (Ok(program), ParserExpectation::Ok(expected)) => {
                let actual = format_program(&program);
                if normalize_sexpr(&actual) != normalize_sexpr(expected) {
                    return TestResult::Fail {
                        expected: expected.clone(),
                        actual,
                    };
                }

                round_trip(&program.statements, keywords).unwrap_or(TestResult::Pass)
            }
            (Ok(program), ParserExpectation::Error(expected)) => TestResult::Fail {
                expected: format!("error: {expected}"),
                actual: format_program(&program),
            },
            (Err(errors), ParserExpectation::Ok(expected)) => TestResult::Fail {
                expected: expected.clone(),
                actual: format!("error: {}", join_errors(&errors)),
            },
            (Err(errors), ParserExpectation::Error(expected)) => {
                let actual = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                TestResult::compare(expected, &actual)
            }
        }
    }
}

/// Each statement's canonical rendering must parse back to exactly that statement.
fn round_trip(statements: &[Statement], keywords: &KeywordTable) -> Option<TestResult> {
    for statement in statements {
        let rendered = statement.to_string();
        let expected = format_statement(statement);
        match parse_with(&rendered, keywords) {
            Ok(reparsed) if reparsed.statements.as_slice() == std::slice::from_ref(statement) => {}
            Ok(reparsed) => {
                return Some(TestResult::Fail {
                    expected: format!("round trip of {rendered:?} to {expected}"),
                    actual: format_program(&reparsed),
                });
            }
            Err(errors) => {
                return Some(TestResult::Fail {
                    expected: format!("round trip of {rendered:?} to {expected}"),
                    actual: format!("error: {}", join_errors(&errors)),
                });
            }
        }
    }
    None
}

fn join_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Normalize S-expression for comparison (collapse whitespace).
fn normalize_sexpr(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run all parser test cases and return a summary.
pub fn run_parser_tests(cases: &[Result<ParserTestCase, (usize, String)>]) -> TestSummary {
    let mut summary = TestSummary::new();

    for case in cases {
        match case {
            Ok(case) => summary.record(&case.name, case.line_number, case.run()),
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
