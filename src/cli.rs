use std::path::PathBuf;

use clap::Parser;
use todobar::DEFAULT_DB_PATH;

use crate::cmd::Commands;

/// File-backed to-do list with priority ordering and progress roll-up.
#[derive(Parser)]
#[command(name = "todobar", version, about = "Prioritised to-do list CLI")]
pub struct Cli {
    /// Path to the JSON task store.
    #[arg(long, global = true, env = "TODOBAR_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
