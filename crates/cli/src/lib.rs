//! linearize CLI -- check whether a recorded history of operations is
//! linearizable against a bundled reference model.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "linearize", about = "Checks whether a recorded history of operations is linearizable")]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a history file for linearizability
    Check(CheckArgs),
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Path to a JSON array of history events (need not be pre-completed)
    #[arg(long)]
    pub input: PathBuf,
    /// Reference model to check the history against
    #[arg(long, value_enum, default_value = "register")]
    pub model: ModelKind,
    /// Number of explorer worker threads (defaults to CPU cores + 2)
    #[arg(long)]
    pub threads: Option<usize>,
    /// log2 of the seen-cache slot count, capped at 24 (defaults to 20)
    #[arg(long)]
    pub seen_bits: Option<u32>,
    /// Print the report as a JSON object instead of a human-readable summary
    #[arg(long)]
    pub json: bool,
    /// Include every last-consistent world and its diagnostic message
    #[arg(long)]
    pub verbose: bool,
}

/// The bundled reference [`linearize_core::Model`] implementations exposed
/// through the CLI. Production callers of the library are expected to
/// implement their own and call [`linearize_core::analysis`] directly - the
/// CLI only ever checks histories against these two worked examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    Register,
    CasRegister,
}
