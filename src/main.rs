//! # todobar - prioritised to-do list CLI
//!
//! A small command-line front end over the `todobar` library: a flat list of
//! tasks kept in one JSON file, listed in priority order and rolled up into a
//! progress summary.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! todobar add "Write report" --tag work --priority 1 --due "tomorrow 09:00"
//!
//! # List open tasks, highest priority first
//! todobar list
//!
//! # Finish it
//! todobar done "Write report"
//!
//! # Overall progress
//! todobar summary
//! ```
//!
//! Data lives in `resources/json/tasks.json` unless `--db` or `TODOBAR_DB`
//! points elsewhere. Set `RUST_LOG=debug` (or pass `-v`) to see what the
//! loader skipped.

use clap::Parser;
use todobar::Database;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Completions need no store
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let db_path = cli.db;
    let mut db = Database::load(&db_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            description, tags, status, priority, important, urgent, due, progress, estimate,
        } => cmd_add(&mut db, &db_path, description, tags, status, priority, important,
                     urgent, due, progress, estimate),

        Commands::List { all } => cmd_list(&db, all),

        Commands::Show { description } => cmd_show(&db, description),

        Commands::Update {
            description, status, progress, estimate, add_tags, rm_tags, due, clear_due,
            postpone_day, postpone_week,
        } => cmd_update(&mut db, &db_path, description, status, progress, estimate,
                        add_tags, rm_tags, due, clear_due, postpone_day, postpone_week),

        Commands::Done { description } => cmd_done(&mut db, &db_path, description),

        Commands::Delete { description } => cmd_delete(&mut db, &db_path, description),

        Commands::Summary => cmd_summary(&db),

        Commands::Tags => cmd_tags(&db),
    }
}
