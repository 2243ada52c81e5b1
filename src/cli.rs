// src/cli.rs
//! CLI definitions for portdeps
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portdeps")]
#[command(author = "portdeps contributors")]
#[command(version)]
#[command(about = "Resolve build dependencies of recipes in a ports tree", long_about = None)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the recipe tree is and how to read it
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Root of the recipe tree [default: current directory]
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Look names missing from the index up by package directory
    #[arg(long)]
    pub directory_fallback: bool,

    /// Walk directories in listing order instead of sorting them
    #[arg(long)]
    pub unsorted: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every package needed to build the given packages
    Resolve {
        /// Package names, bare (gcc) or prefixed (cmd:gcc)
        #[arg(required = true)]
        packages: Vec<String>,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Print the result and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which recipe provides a name
    Provides {
        /// Name to look up, bare or prefixed
        name: String,

        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Show the sections parsed from a single recipe file
    Parse {
        /// Path to the recipe file
        recipe: PathBuf,

        /// Print the sections as JSON
        #[arg(long)]
        json: bool,
    },
}
