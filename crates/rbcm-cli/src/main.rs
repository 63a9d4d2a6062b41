// crates/rbcm-cli/src/main.rs
//
// CLI entrypoint for the RBCM developer tools.
//
// Provides subcommands for recording feedback, viewing network state,
// launching attack scenarios, and checking daemon status.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::feedback::FeedbackCmd;
use commands::score::ScoreCmd;
use commands::state::StateCmd;

/// RBCM CLI — developer tools for the reputation simulator.
#[derive(Parser, Debug)]
#[command(
    name = "rbcm",
    version = "0.1.0",
    about = "RBCM CLI for the trust-score reputation simulator"
)]
struct Cli {
    /// Base URL of the rbcm-daemon; the service path is appended.
    #[arg(long, global = true, default_value = "http://localhost:5000")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Record success/failure feedback for a physical node.
    Feedback(FeedbackCmd),

    /// Display the network state sorted by score.
    State(StateCmd),

    /// Look up a single node's score.
    Score(ScoreCmd),

    /// Inject a sybil attack (50 fake virtual nodes).
    Sybil,

    /// Toggle rogue mode for the simulated population.
    Rogue,

    /// Display daemon health and population counts.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Feedback(cmd) => commands::feedback::run(&cli.rpc, cmd).await?,
        Commands::State(cmd) => commands::state::run(&cli.rpc, cmd).await?,
        Commands::Score(cmd) => commands::score::run(&cli.rpc, cmd).await?,
        Commands::Sybil => commands::attack::run_sybil(&cli.rpc).await?,
        Commands::Rogue => commands::attack::run_rogue(&cli.rpc).await?,
        Commands::Status => commands::status::run(&cli.rpc).await?,
    }

    Ok(())
}
