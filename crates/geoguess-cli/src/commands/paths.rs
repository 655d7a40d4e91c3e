use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use geoguess_infrastructure::paths::GamePaths;

pub fn run(paths: &GamePaths, config: Option<PathBuf>) -> Result<()> {
    let config_file = match &config {
        Some(path) => path.clone(),
        None => paths.config_file()?,
    };

    println!("{}", "=== geoguess paths ===".bright_magenta().bold());
    println!("config:      {}", config_file.display());
    println!("snapshots:   {}", paths.snapshots_dir()?.display());
    println!("leaderboard: {}", paths.leaderboard_file()?.display());
    println!("logs:        {}", paths.logs_dir()?.display());

    let game = super::config_service(paths, config).game_config();
    println!();
    println!("{}", "[game]".bright_cyan());
    println!("session_length = {}", game.session_length);
    println!("max_attempts = {}", game.max_attempts);
    println!("snapshot_max_age_hours = {}", game.snapshot_max_age_hours);
    println!("summary_delay_ms = {}", game.summary_delay_ms);
    println!("recent_window = {}", game.recent_window);
    Ok(())
}
