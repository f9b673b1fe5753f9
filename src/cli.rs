//! Command-line interface for tabletoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabletoe::Model;

/// Tabletoe - tic-tac-toe against a precomputed action-value table
#[derive(Parser, Debug)]
#[command(name = "tabletoe")]
#[command(about = "Play tic-tac-toe against a table-driven AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "tabletoe.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Model to load first (overrides the config)
        #[arg(short, long)]
        model: Option<Model>,
    },

    /// Serve the game over HTTP (JSON API plus table assets)
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory served under /tables (defaults to the table source when it is a directory)
        #[arg(long)]
        tables_dir: Option<PathBuf>,
    },

    /// Show the AI's choice for a board, e.g. "XX..O...."
    Suggest {
        /// Board as 9 cells of X, O or '.', row-major
        board: String,

        /// Model to consult (overrides the config)
        #[arg(short, long)]
        model: Option<Model>,
    },

    /// List the model catalog
    Models,
}
