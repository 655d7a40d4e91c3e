use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use geoguess_core::snapshot::ScreenKind;
use geoguess_infrastructure::paths::GamePaths;

mod commands;
mod helper;
mod navigator;
mod render;

#[derive(Parser)]
#[command(name = "geoguess")]
#[command(about = "geoguess - guess the country, resume where you left off", long_about = None)]
struct Cli {
    /// Keep config, snapshots and logs under this directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read the game configuration from this file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session on one screen
    Play {
        /// classic, duel or panorama
        #[arg(long, default_value = "classic")]
        screen: ScreenKind,

        /// Base URL for panorama images (`<base>/<code>.jpg`)
        #[arg(long)]
        image_base_url: Option<String>,
    },
    /// Show the offline leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print resolved file locations and the active configuration
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = GamePaths::new(cli.data_dir);

    let log_dir = paths.logs_dir().ok();
    let _log_guard = geoguess_infrastructure::logging::init_logging(log_dir.as_deref());

    match cli.command {
        Commands::Play {
            screen,
            image_base_url,
        } => commands::play::run(&paths, cli.config, screen, image_base_url).await?,
        Commands::Leaderboard { limit } => commands::leaderboard::run(&paths, limit).await?,
        Commands::Paths => commands::paths::run(&paths, cli.config)?,
    }

    Ok(())
}
