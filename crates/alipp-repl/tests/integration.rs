//! Integration tests for the alipp REPL.
//!
//! These tests run scripts through the REPL and verify behavior.

use alipp_kernel::Dialect;
use alipp_repl::{OutputMode, Repl, ReplConfig, greeting};
use rstest::rstest;

/// Helper to run multiple lines through a REPL and collect outputs.
fn run_script(repl: &mut Repl, script: &str) -> Vec<String> {
    let mut outputs = Vec::new();

    for line in script.lines() {
        // Skip comments and empty lines
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match repl.process_line(line) {
            Ok(Some(output)) => outputs.push(output),
            Ok(None) => {}
            Err(e) => outputs.push(format!("ERROR: {}", e)),
        }
    }

    outputs
}

fn repl_in(mode: OutputMode) -> Repl {
    Repl::with_config(ReplConfig {
        mode,
        ..ReplConfig::default()
    })
}

// ============================================================================
// Output modes
// ============================================================================

#[test]
fn tokens_mode_prints_one_token_per_line() {
    let mut repl = Repl::new();
    let outputs = run_script(&mut repl, "let x = 5;");
    assert_eq!(
        outputs,
        vec![
            "{kind:LET text:\"let\"}\n{kind:IDENT text:\"x\"}\n{kind:ASSIGN text:\"=\"}\n\
             {kind:INT text:\"5\"}\n{kind:SEMICOLON text:\";\"}"
        ]
    );
}

#[test]
fn tokens_mode_does_not_parse() {
    let mut repl = Repl::new();
    let outputs = run_script(&mut repl, "let = @");
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].contains("{kind:ILLEGAL text:\"@\"}"));
    assert!(!outputs[0].contains("parser has"));
}

#[rstest]
#[case::ast(OutputMode::Ast, "-a * b; let x = 1", "((-a) * b)\nlet x = 1;")]
#[case::sexpr(OutputMode::Sexpr, "return !ok", "(return (prefix ! (ident ok)))")]
fn tree_modes(#[case] mode: OutputMode, #[case] line: &str, #[case] expected: &str) {
    let mut repl = repl_in(mode);
    assert_eq!(run_script(&mut repl, line), vec![expected.to_string()]);
}

#[rstest]
#[case::ast(OutputMode::Ast)]
#[case::sexpr(OutputMode::Sexpr)]
#[case::debug(OutputMode::Debug)]
#[case::json(OutputMode::Json)]
fn tree_modes_report_deep_nesting(#[case] mode: OutputMode) {
    let mut repl = repl_in(mode);
    let deep = format!("{}x", "-".repeat(5_000));
    assert_eq!(
        run_script(&mut repl, &deep),
        vec!["parser has 1 errors:\n  expression nested more than 256 levels deep".to_string()]
    );
}

#[test]
fn debug_mode_pretty_prints() {
    let mut repl = repl_in(OutputMode::Debug);
    let outputs = run_script(&mut repl, "5");
    assert!(outputs[0].starts_with("Program {"));
    assert!(outputs[0].contains("IntegerLiteral"));
}

#[test]
fn json_mode_emits_valid_json() {
    let mut repl = repl_in(OutputMode::Json);
    let outputs = run_script(&mut repl, "let x = 1 + 2;");
    let value: serde_json::Value = serde_json::from_str(&outputs[0]).expect("valid JSON");
    assert_eq!(value["statements"][0]["type"], "let");
    assert_eq!(value["statements"][0]["value"]["type"], "infix");
    assert_eq!(value["statements"][0]["value"]["operator"], "+");
}

#[test]
fn parse_errors_are_output_not_failures() {
    let mut repl = repl_in(OutputMode::Ast);
    let outputs = run_script(&mut repl, "let = 5;");
    assert_eq!(
        outputs,
        vec![
            "parser has 2 errors:\n  expected next token to be IDENT, got = instead\n  \
             no prefix parse function for = found"
        ]
    );
}

#[test]
fn blank_lines_print_nothing() {
    let mut repl = Repl::new();
    assert_eq!(repl.process_line("   ").expect("process"), None);
}

// ============================================================================
// Meta-commands
// ============================================================================

#[test]
fn mode_command_switches_output() {
    let mut repl = Repl::new();
    let outputs = run_script(
        &mut repl,
        r#"
        /mode
        /mode sexpr
        1 + 2
        /mode nonsense
    "#,
    );
    assert_eq!(outputs[0], "mode: tokens");
    assert_eq!(outputs[1], "mode: sexpr");
    assert_eq!(outputs[2], "(expr (infix + (int 1) (int 2)))");
    assert!(outputs[3].contains("unknown output mode 'nonsense'"));
    assert_eq!(repl.config().mode, OutputMode::Sexpr);
}

#[test]
fn dialect_command_switches_keywords() {
    let mut repl = repl_in(OutputMode::Sexpr);
    let outputs = run_script(
        &mut repl,
        r#"
        /dialect ky
        сакта x = туура;
        /dialect klingon
    "#,
    );
    assert_eq!(outputs[0], "dialect: kyrgyz");
    assert_eq!(outputs[1], "(let x (bool true))");
    assert!(outputs[2].contains("unknown dialect 'klingon'"));
    assert_eq!(repl.config().dialect, Dialect::Kyrgyz);
}

#[test]
fn keywords_command_lists_current_dialect() {
    let mut repl = Repl::new();
    let outputs = run_script(&mut repl, "/keywords\n/dialect ky\n/k");
    assert!(outputs[0].starts_with("keywords (english):"));
    assert!(outputs[0].contains("\n  LET      let"));
    assert_eq!(
        outputs[2],
        "keywords (kyrgyz):\n  FUNCTION функ, функция\n  LET      бер, сакта\n  TRUE     туура\n  FALSE    ката\n  IF       эгер\n  ELSE     же\n  RETURN   кайтар"
    );
}

#[rstest]
#[case::quit("/quit")]
#[case::q("/q")]
#[case::exit("/exit")]
fn quit_requests_exit(#[case] command: &str) {
    let mut repl = Repl::new();
    assert!(!repl.should_exit());
    assert_eq!(repl.process_line(command).expect("process"), None);
    assert!(repl.should_exit());
}

#[test]
fn help_and_unknown_commands() {
    let mut repl = Repl::new();
    let outputs = run_script(&mut repl, "/help\n/frobnicate");
    assert!(outputs[0].contains("/mode"));
    assert!(outputs[1].starts_with("Unknown command: /frobnicate"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_from_lookup() {
    let config = ReplConfig::from_lookup(|key| match key {
        "ALIPP_DIALECT" => Some("kyrgyz".to_string()),
        "ALIPP_MODE" => Some("JSON".to_string()),
        _ => None,
    })
    .expect("valid config");
    assert_eq!(config.dialect, Dialect::Kyrgyz);
    assert_eq!(config.mode, OutputMode::Json);
}

#[test]
fn config_defaults_when_unset() {
    let config = ReplConfig::from_lookup(|_| None).expect("valid config");
    assert_eq!(config, ReplConfig::default());
}

#[test]
fn config_rejects_bad_mode() {
    let err = ReplConfig::from_lookup(|key| (key == "ALIPP_MODE").then(|| "xml".to_string()))
        .expect_err("bad mode");
    let message = format!("{err:#}");
    assert!(message.contains("invalid ALIPP_MODE"), "{message}");
    assert!(message.contains("unknown output mode 'xml'"), "{message}");
}

#[test]
fn greetings() {
    assert!(greeting(Dialect::English, None).starts_with("alipp v"));
    assert!(greeting(Dialect::Kyrgyz, Some("aidai")).starts_with("Салам aidai! Бул alipp"));
    assert!(greeting(Dialect::Kyrgyz, None).starts_with("Салам! "));
}
