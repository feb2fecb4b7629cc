//! alipp REPL: read a line, lex or parse it, print the result.
//!
//! There is no evaluator, so the REPL is a window onto the front end:
//!
//! - `tokens` mode (default) prints one token per line
//! - `ast`, `sexpr`, `debug` and `json` modes parse the line and print the tree
//! - Meta-commands: `/help`, `/quit`, `/mode`, `/dialect`, `/keywords`

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use alipp_kernel::ast::Program;
use alipp_kernel::ast::sexpr::format_program;
use alipp_kernel::{Dialect, Lexer, ParseError, TokenKind, parse_with};

/// Environment variable selecting the keyword dialect.
pub const DIALECT_ENV: &str = "ALIPP_DIALECT";
/// Environment variable selecting the output mode.
pub const MODE_ENV: &str = "ALIPP_MODE";

/// What the REPL prints for each line of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// The raw token stream, EOF excluded.
    #[default]
    Tokens,
    /// Canonical (fully parenthesized) rendering.
    Ast,
    Sexpr,
    /// Pretty-printed `Debug` of the tree.
    Debug,
    Json,
}

impl OutputMode {
    pub const ALL: [OutputMode; 5] = [
        OutputMode::Tokens,
        OutputMode::Ast,
        OutputMode::Sexpr,
        OutputMode::Debug,
        OutputMode::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputMode::Tokens => "tokens",
            OutputMode::Ast => "ast",
            OutputMode::Sexpr => "sexpr",
            OutputMode::Debug => "debug",
            OutputMode::Json => "json",
        }
    }

    /// How to print a parsed program, or `None` when the mode never parses.
    fn tree_format(self) -> Option<TreeFormat> {
        match self {
            OutputMode::Tokens => None,
            OutputMode::Ast => Some(TreeFormat::Ast),
            OutputMode::Sexpr => Some(TreeFormat::Sexpr),
            OutputMode::Debug => Some(TreeFormat::Debug),
            OutputMode::Json => Some(TreeFormat::Json),
        }
    }
}

/// The output modes that print a parse tree.
#[derive(Debug, Clone, Copy)]
enum TreeFormat {
    Ast,
    Sexpr,
    Debug,
    Json,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        OutputMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = OutputMode::ALL.iter().map(|m| m.name()).collect();
                anyhow::anyhow!(
                    "unknown output mode '{}' (expected one of: {})",
                    s.trim(),
                    names.join(", ")
                )
            })
    }
}

/// REPL settings, overridable from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplConfig {
    pub dialect: Dialect,
    pub mode: OutputMode,
}

impl ReplConfig {
    /// Read `ALIPP_DIALECT` and `ALIPP_MODE`; unset variables keep the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(DIALECT_ENV).filter(|v| !v.trim().is_empty()) {
            config.dialect = value
                .parse()
                .with_context(|| format!("invalid {DIALECT_ENV}"))?;
        }
        if let Some(value) = lookup(MODE_ENV).filter(|v| !v.trim().is_empty()) {
            config.mode = value
                .parse()
                .with_context(|| format!("invalid {MODE_ENV}"))?;
        }

        Ok(config)
    }
}

/// REPL state.
pub struct Repl {
    config: ReplConfig,
    exit_requested: bool,
}

impl Repl {
    /// Create a new REPL with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReplConfig::default())
    }

    pub fn with_config(config: ReplConfig) -> Self {
        Self {
            config,
            exit_requested: false,
        }
    }

    pub fn config(&self) -> ReplConfig {
        self.config
    }

    /// True once `/quit` has been processed.
    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    /// Process a single line of input.
    ///
    /// Syntax errors are part of the output; `Err` means the REPL itself failed.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();

        if trimmed.starts_with('/') {
            return self.handle_meta_command(trimmed);
        }
        if trimmed.is_empty() {
            return Ok(None);
        }

        let keywords = self.config.dialect.keywords();
        let output = match self.config.mode.tree_format() {
            None => Lexer::with_keywords(trimmed, keywords)
                .map(|token| token.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            Some(format) => match parse_with(trimmed, keywords) {
                Ok(program) => render(&program, format)?,
                Err(errors) => format_errors(&errors),
            },
        };

        Ok(Some(output).filter(|s| !s.is_empty()))
    }

    /// Handle a meta-command (starts with /).
    fn handle_meta_command(&mut self, cmd: &str) -> Result<Option<String>> {
        let mut parts = cmd.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        match command {
            "/quit" | "/q" | "/exit" => {
                self.exit_requested = true;
                Ok(None)
            }
            "/help" | "/h" | "/?" => Ok(Some(HELP_TEXT.to_string())),
            "/mode" => Ok(Some(match argument.map(str::parse::<OutputMode>) {
                None => format!("mode: {}", self.config.mode),
                Some(Ok(mode)) => {
                    tracing::debug!(%mode, "output mode changed");
                    self.config.mode = mode;
                    format!("mode: {mode}")
                }
                Some(Err(e)) => e.to_string(),
            })),
            "/dialect" => Ok(Some(match argument.map(str::parse::<Dialect>) {
                None => format!("dialect: {}", self.config.dialect),
                Some(Ok(dialect)) => {
                    tracing::debug!(%dialect, "dialect changed");
                    self.config.dialect = dialect;
                    format!("dialect: {dialect}")
                }
                Some(Err(e)) => e.to_string(),
            })),
            "/keywords" | "/k" => Ok(Some(keyword_listing(self.config.dialect))),
            _ => Ok(Some(format!(
                "Unknown command: {command}\nType /help for available commands."
            ))),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a parsed program. `Ast` prints one statement per line.
fn render(program: &Program, format: TreeFormat) -> Result<String> {
    Ok(match format {
        TreeFormat::Ast => program
            .statements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        TreeFormat::Sexpr => format_program(program),
        TreeFormat::Debug => format!("{program:#?}"),
        TreeFormat::Json => {
            serde_json::to_string_pretty(program).context("failed to serialize AST")?
        }
    })
}

/// Every keyword kind with its spellings in `dialect`.
fn keyword_listing(dialect: Dialect) -> String {
    let table = dialect.keywords();
    let mut out = format!("keywords ({dialect}):");
    for kind in TokenKind::ALL.into_iter().filter(|kind| kind.is_keyword()) {
        out.push_str(&format!("\n  {:<9}{}", kind.name(), table.spellings(kind).join(", ")));
    }
    out
}

fn format_errors(errors: &[ParseError]) -> String {
    let mut msg = format!("parser has {} errors:", errors.len());
    for err in errors {
        msg.push_str(&format!("\n  {err}"));
    }
    msg
}

/// Startup banner for `dialect`. The Kyrgyz banner greets `user` by name.
pub fn greeting(dialect: Dialect, user: Option<&str>) -> String {
    match dialect {
        Dialect::English => format!(
            "alipp v{}\nType /help for commands, /quit or Ctrl-D to exit.\n",
            env!("CARGO_PKG_VERSION")
        ),
        Dialect::Kyrgyz => {
            let salute = match user {
                Some(name) => format!("Салам {name}!"),
                None => "Салам!".to_string(),
            };
            format!(
                "{salute} Бул alipp программалоо тили!\n\
                 Өзүңүз каалагандай тилди изилдеп көрүңүз\n\n\
                 Бул жерден чыгуу үчүн Ctrl жана D баскычтарын басыңыз\n"
            )
        }
    }
}

/// Login name of the current user, if the environment knows it.
fn login_name() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok())
        .filter(|name| !name.is_empty())
}

const HELP_TEXT: &str = r#"alipp REPL

Commands:
  /help, /h, /?       Show this help
  /quit, /q, /exit    Exit the REPL
  /mode [name]        Show or set the output mode:
                        tokens, ast, sexpr, debug, json
  /dialect [name]     Show or set keywords: en, ky
  /keywords, /k       List the keywords of the current dialect

Language:
  let x = 1 + 2;      Binding
  return x * 3;       Return statement
  -a == !b            Prefix and infix operators
  (a + b) * c         Grouping

Environment:
  ALIPP_DIALECT       Startup dialect
  ALIPP_MODE          Startup output mode
  RUST_LOG            Log filter (e.g. alipp_kernel=trace)
"#;

/// Run the REPL.
pub fn run() -> Result<()> {
    let config = ReplConfig::from_env()?;
    println!(
        "{}",
        greeting(config.dialect, login_name().as_deref()).bold()
    );

    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("Failed to create editor")?;

    // Load history if it exists
    let history_path = directories::ProjectDirs::from("", "", "alipp")
        .map(|dirs| dirs.data_dir().join("history.txt"));
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut repl = Repl::with_config(config);
    tracing::info!(dialect = %config.dialect, mode = %config.mode, "repl started");

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                match repl.process_line(&line) {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => {}
                    Err(e) => eprintln!("{} {e:#}", "Error:".red()),
                }
                if repl.should_exit() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("{} {err}", "Error:".red());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}
