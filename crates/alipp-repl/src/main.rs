//! alipp REPL entry point.
//!
//! Launch the interactive prompt:
//! ```bash
//! cargo run -p alipp-repl
//! ALIPP_DIALECT=ky ALIPP_MODE=sexpr cargo run -p alipp-repl
//! ```

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    alipp_repl::run()
}
