use anyhow::Result;
use colored::Colorize;
use geoguess_infrastructure::FileLeaderboard;
use geoguess_infrastructure::paths::GamePaths;

pub async fn run(paths: &GamePaths, limit: usize) -> Result<()> {
    let leaderboard = FileLeaderboard::new(paths.data_dir()?);
    let entries = leaderboard.entries().await?;

    println!("{}", "=== Leaderboard ===".bright_magenta().bold());
    if entries.is_empty() {
        println!("{}", "No scores yet.".bright_black());
        return Ok(());
    }

    for (rank, entry) in entries.iter().take(limit).enumerate() {
        println!(
            "{:>3}. {:>5}  {}/{} solved, {} first try{}  {}",
            rank + 1,
            entry.score.to_string().bright_green(),
            entry.stats.rounds_solved,
            entry.stats.rounds_played,
            entry.stats.first_try_solves,
            if entry.stats.continued { ", continued" } else { "" },
            entry.submitted_at.bright_black()
        );
    }
    Ok(())
}
