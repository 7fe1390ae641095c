//! HEXMIND CLI - Command-line interface
//!
//! Commands:
//! - decide: Choose a move for a position file or an empty board
//! - play: Engine-vs-engine self-play on an empty board

mod decide_cmd;
mod play_cmd;
mod search_args;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexmind")]
#[command(about = "Alpha-beta move engine for the game of Hex")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a move for one position
    Decide(decide_cmd::DecideArgs),
    /// Let the engine play both sides of a game
    Play(play_cmd::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide(args) => decide_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
    }
}
