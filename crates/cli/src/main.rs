// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use changelog_cli::commands::{count, list, prune, show, status};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "changelog")]
#[command(about = "Inspect and prune the Alert change log", long_about = None)]
struct Cli {
    /// Change log directory
    #[arg(long, short, global = true, env = "ALERT_CHANGELOG_DIR", default_value = "data-exports")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries, oldest first
    List {
        /// CREATE, UPDATE or DELETE
        #[arg(long, short)]
        operation: Option<String>,
    },
    /// Count entries
    Count {
        #[arg(long, short)]
        operation: Option<String>,
    },
    /// Print one entry
    Show {
        name: String,
    },
    /// Delete all but the most recent entries
    Prune {
        #[arg(long, short)]
        operation: Option<String>,

        /// Entries to keep (default ALERT_CHANGELOG_KEEP, else 50)
        #[arg(long, short, allow_hyphen_values = true)]
        keep: Option<i64>,
    },
    /// Show whether the log is active and per-operation counts
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { operation } => list::run(&cli.dir, operation.as_deref()),
        Commands::Count { operation } => count::run(&cli.dir, operation.as_deref()),
        Commands::Show { name } => show::run(&cli.dir, &name),
        Commands::Prune { operation, keep } => prune::run(&cli.dir, operation.as_deref(), keep),
        Commands::Status => status::run(&cli.dir),
    }
}
