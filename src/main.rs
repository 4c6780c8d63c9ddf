mod cli;
mod config;
mod models;
mod services;
mod utils;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::cli::FixtureSelection;
use crate::config::ModelArgs;

#[derive(Parser)]
#[command(name = "matchcast")]
#[command(about = "Pre-match football forecasts from recent form and head-to-head history")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported competitions
    Leagues,
    /// List upcoming fixtures for a competition
    Fixtures {
        #[arg(short, long, default_value = "PL")]
        competition: String,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Forecast an upcoming fixture
    Predict {
        #[arg(short, long, default_value = "PL")]
        competition: String,
        /// Position of the fixture in the `fixtures` listing (1-based)
        #[arg(short, long, conflicts_with_all = ["home", "away"])]
        fixture: Option<usize>,
        /// Home team name, matched loosely against the fixture list
        #[arg(long, requires = "away")]
        home: Option<String>,
        #[arg(long, requires = "home")]
        away: Option<String>,
        /// Print the forecast as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables first so RUST_LOG and flag defaults can come from .env
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Leagues => cli::show_leagues(),
        Commands::Fixtures { competition, limit } => {
            tracing::info!("Listing fixtures for {}", competition);
            cli::show_fixtures(&competition, limit).await?;
        }
        Commands::Predict { competition, fixture, home, away, json, model } => {
            let selection = match (fixture, home, away) {
                (Some(n), _, _) => FixtureSelection::Index(n),
                (None, Some(home), Some(away)) => FixtureSelection::Teams { home, away },
                _ => bail!("Pick a fixture with --fixture <N> or --home <NAME> --away <NAME>"),
            };
            tracing::info!("Generating prediction for {}...", competition);
            cli::predict_fixture(&competition, selection, &model, json).await?;
        }
    }

    Ok(())
}
