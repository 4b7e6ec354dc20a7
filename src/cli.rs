//! Command-line interface for steadfast.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Steadfast - tic-tac-toe that survives being closed
#[derive(Parser, Debug)]
#[command(name = "steadfast")]
#[command(about = "Tic-tac-toe whose game is saved after every move", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file (overrides the config)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Key scope inside the snapshot file (overrides the config)
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the saved game
    Show,

    /// Play the current player's mark on a cell (0-8, row-major)
    Move {
        /// Cell index
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Start a new game once the current one is over
    NewGame,

    /// Play interactively: a cell number moves, `n` starts a new game, `q` quits
    Play,
}
