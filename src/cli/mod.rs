//! CLI module - Command-line interface for lostdocs
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// lostdocs - Lost-item report letter registry
#[derive(Parser)]
#[command(name = "lostdocs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Copy the live database into the configured backup directory
    Backup,

    /// Show the most recent audit log entries
    #[command(alias = "log")]
    Audit {
        /// Number of entries to show
        #[arg(default_value = "20")]
        limit: usize,
    },
}

pub use commands::*;
