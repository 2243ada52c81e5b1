// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Resolve {
            packages,
            corpus,
            json,
        } => commands::cmd_resolve(&packages, &corpus, json),
        Commands::Provides { name, corpus } => commands::cmd_provides(&name, &corpus),
        Commands::Parse { recipe, json } => commands::cmd_parse(&recipe, json),
    }
}
