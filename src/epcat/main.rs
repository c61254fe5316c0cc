//! # Epcat CLI
//!
//! The binary is thin: the CLI lives in `src/epcat/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/)                                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch on tokio (commands.rs)         │
//! │  - Terminal rendering (print.rs)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) → Command Layer → Engine                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logging goes to stderr through `tracing-subscriber`; `--verbose` enables debug
//! output. Everything the user asked for goes to stdout.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
