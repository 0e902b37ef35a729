//! Empire Game - console front-end
//!
//! Reads command lines from stdin and prints room output to stdout.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use empire_game::{
    CommandLine, ConsoleMessenger, GameConfig, Reply, SessionRegistry, StaticDirectory, execute,
    rules_text, usage,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a default config file.
const CONFIG_ENV: &str = "EMPIRE_GAME_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,empire_game=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config, seed } => run_console(config.as_deref(), seed).await,
        Command::Rules { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", rules_text(&config));
            Ok(())
        }
    }
}

/// Loads the config from the flag, the environment, or defaults.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let env_path = std::env::var(CONFIG_ENV).ok();
    let path = path.or(env_path.as_deref().map(Path::new));
    match path {
        Some(path) => Ok(GameConfig::from_file(path)?),
        None => {
            info!("No config file given, using default rules");
            Ok(GameConfig::default())
        }
    }
}

/// Runs the console loop until stdin closes.
#[instrument]
async fn run_console(config: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let registry = SessionRegistry::new(
        config,
        Arc::new(ConsoleMessenger),
        Arc::new(StaticDirectory::new()),
    );
    info!("Console ready");
    println!("Commands:\n{}", usage());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "help" {
            println!("{}", usage());
            continue;
        }

        let parsed: CommandLine = match line.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("error: {}", e);
                continue;
            }
        };
        let actor = parsed.actor.clone();
        match execute(&registry, parsed).await {
            Ok(Reply::Ack(text)) => println!("({} only) {}", actor, text),
            Ok(Reply::Text(text)) => println!("{}", text),
            Ok(Reply::Status(snapshot)) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            Err(e) => {
                warn!(actor = %actor, error = %e, "Command rejected");
                println!("({} only) {}", actor, e);
            }
        }
    }

    info!(rooms = registry.room_ids().len(), "Input closed, shutting down");
    Ok(())
}
