//! Property-based tests for the lexer and parser.
//!
//! 1. **Lexer never panics** and every token stream ends in exactly one EOF
//! 2. **No input is lost**: token texts concatenate to the input minus whitespace
//! 3. **EOF is sticky** once the input is exhausted
//! 4. **Parser never panics**, whatever the token stream
//! 5. **Deep nesting is a diagnostic**, not a stack overflow
//! 6. **Canonical rendering round-trips** for generated expressions

use alipp_kernel::lexer::{tokenize, tokenize_with};
use alipp_kernel::{Dialect, Lexer, MAX_NESTING_DEPTH, ParseError, Token, TokenKind, parse};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Source-like text: operators, words in both scripts, digits and junk.
fn source_like() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("=".to_string()),
            Just("==".to_string()),
            Just("!".to_string()),
            Just("!=".to_string()),
            "[-+*/<>,;(){}]",
            "[a-z_]{1,6}",
            "[а-яүөң]{1,6}",
            "[0-9]{1,4}",
            "[ \t\n]{1,3}",
            "[@#$%&]",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

const NESTING_OPENERS: &[&str] = &["-", "!", "("];

/// One operand under at least `MAX_NESTING_DEPTH` openers, closed where needed.
fn deeply_nested() -> impl Strategy<Value = String> {
    (
        prop::sample::select(NESTING_OPENERS),
        MAX_NESTING_DEPTH..20_000usize,
    )
        .prop_map(|(open, depth)| {
            let close = if open == "(" { ")" } else { "" };
            format!("{}x{}", open.repeat(depth), close.repeat(depth))
        })
}

const PREFIX_OPERATORS: &[&str] = &["-", "!"];
const INFIX_OPERATORS: &[&str] = &["+", "-", "*", "/", "<", ">", "==", "!="];

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        // No keyword starts with `v` or `ш`.
        "v[a-z_]{0,4}",
        "ш[а-я]{0,3}",
        (0i64..100_000).prop_map(|n| n.to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
    ]
}

/// Well-formed expressions over every prefix and infix operator.
fn expression() -> impl Strategy<Value = String> {
    operand().prop_recursive(5, 48, 2, |inner| {
        prop_oneof![
            (prop::sample::select(PREFIX_OPERATORS), inner.clone())
                .prop_map(|(op, e)| format!("{op}{e}")),
            (
                inner.clone(),
                prop::sample::select(INFIX_OPERATORS),
                inner.clone(),
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.prop_map(|e| format!("({e})")),
        ]
    })
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn lexer_never_panics(input in "\\PC{0,300}") {
        let tokens = tokenize(&input);
        prop_assert_eq!(tokens.last(), Some(&Token::eof()));
        prop_assert_eq!(tokens.iter().filter(|t| t.is(TokenKind::Eof)).count(), 1);
    }

    #[test]
    fn kyrgyz_lexer_never_panics(input in source_like()) {
        let tokens = tokenize_with(&input, Dialect::Kyrgyz.keywords());
        prop_assert_eq!(tokens.last(), Some(&Token::eof()));
    }

    #[test]
    fn tokens_cover_every_non_whitespace_char(input in "\\PC{0,300}") {
        let joined: String = Lexer::new(&input).map(|t| t.text).collect();
        let expected: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
            .collect();
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn eof_is_sticky(input in source_like(), extra in 1usize..8) {
        let mut lexer = Lexer::new(&input);
        while !lexer.next_token().is(TokenKind::Eof) {}
        for _ in 0..extra {
            prop_assert_eq!(lexer.next_token(), Token::eof());
        }
    }

    #[test]
    fn parser_never_panics(input in source_like()) {
        let _ = parse(&input);
    }

    #[test]
    fn deep_nesting_is_reported(input in deeply_nested()) {
        let errors = parse(&input).err();
        prop_assert_eq!(errors, Some(vec![ParseError::NestingTooDeep(MAX_NESTING_DEPTH)]));
    }

    #[test]
    fn canonical_rendering_round_trips(source in expression()) {
        let program = parse(&source).map_err(|errors| {
            TestCaseError::fail(format!("{source:?} failed to parse: {errors:?}"))
        })?;
        prop_assert_eq!(program.statements.len(), 1);

        let rendered = program.to_string();
        let reparsed = parse(&rendered).map_err(|errors| {
            TestCaseError::fail(format!("rendering {rendered:?} failed to parse: {errors:?}"))
        })?;
        prop_assert_eq!(&reparsed, &program);
        prop_assert_eq!(reparsed.to_string(), rendered);
    }
}
