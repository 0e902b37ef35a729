//! Command-line interface for empire_game.

use clap::{Parser, Subcommand};

/// Empire Game - alias-guessing elimination game engine
#[derive(Parser, Debug)]
#[command(name = "empire_game")]
#[command(about = "Turn-based alias-guessing elimination game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play from the console: one `<room> <player> <command> [args]` per line
    Play {
        /// Path to the game rules config (TOML)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for turn order and alias shuffles
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the rules
    Rules {
        /// Path to the game rules config (TOML)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}
