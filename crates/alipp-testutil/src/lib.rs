//! Test utilities for alipp.
//!
//! Provides parsers and runners for the fixture formats used across the workspace:
//! - `tests/lexer/tokens.txt`: one lexer case per line, `input ⇒ TOKENS`
//! - `tests/parser/*.test`: block-structured parser cases with an expected
//!   S-expression or the expected diagnostics
//!
//! Both formats accept a `# dialect: <name>` directive that switches the keyword
//! table for the cases that follow it.

pub mod lexer;
pub mod parser;

use std::fmt;

use alipp_kernel::Dialect;

/// The result of running a single test case.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with expected vs actual mismatch.
    Fail { expected: String, actual: String },
    /// The fixture itself is malformed.
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    /// Pass when `expected == actual`, otherwise a failure carrying both.
    pub fn compare(expected: &str, actual: &str) -> Self {
        if expected == actual {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: expected.to_string(),
                actual: actual.to_string(),
            }
        }
    }
}

/// Summary of running multiple test cases.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub failures: Vec<TestFailure>,
}

/// A single test failure with context.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match &result {
            TestResult::Pass => {
                self.passed += 1;
                return;
            }
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.failures.push(TestFailure {
            name: name.into(),
            line,
            result,
        });
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "═".repeat(60))?;
        writeln!(f, "Test Summary: {} total", self.total())?;
        writeln!(
            f,
            "  ✓ {} passed  ✗ {} failed  ⚠ {} errors",
            self.passed, self.failed, self.errors
        )?;

        if !self.failures.is_empty() {
            writeln!(f, "\nFailures:")?;
            for failure in &self.failures {
                writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
                match &failure.result {
                    TestResult::Fail { expected, actual } => {
                        writeln!(f, "    expected: {}", expected)?;
                        writeln!(f, "    actual:   {}", actual)?;
                    }
                    TestResult::Error { message } => {
                        writeln!(f, "    error: {}", message)?;
                    }
                    TestResult::Pass => {}
                }
            }
        }
        writeln!(f, "{}", "═".repeat(60))?;
        Ok(())
    }
}

/// Recognise a `# dialect: <name>` directive line.
///
/// Returns `None` for any other line, `Some(Err(..))` for an unknown dialect.
pub fn dialect_directive(line: &str) -> Option<Result<Dialect, String>> {
    let name = line.trim().strip_prefix("# dialect:")?;
    Some(name.parse::<Dialect>().map_err(|e| e.to_string()))
}
