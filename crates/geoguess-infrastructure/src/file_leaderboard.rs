//! Offline leaderboard persisted as a JSON array.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::session::{ScoreStats, ScoreSubmitter};
use geoguess_core::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::storage::FileKeyValueStorage;

const LEADERBOARD_KEY: &str = "leaderboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub session_id: String,
    pub score: i32,
    pub stats: ScoreStats,
    /// RFC 3339 submission time.
    pub submitted_at: String,
}

/// Score submitter that keeps entries in a local file.
#[derive(Clone)]
pub struct FileLeaderboard {
    storage: FileKeyValueStorage,
    /// Serializes read-modify-write cycles.
    write_lock: Arc<Mutex<()>>,
}

impl FileLeaderboard {
    /// `dir` holds `leaderboard.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: FileKeyValueStorage::new(dir),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All entries, best score first.
    pub async fn entries(&self) -> Result<Vec<LeaderboardEntry>> {
        let mut entries = self.load().await?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(entries)
    }

    async fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        match self.storage.get(LEADERBOARD_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ScoreSubmitter for FileLeaderboard {
    async fn submit(&self, session_id: &str, score: i32, stats: &ScoreStats) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        entries.push(LeaderboardEntry {
            session_id: session_id.to_string(),
            score,
            stats: stats.clone(),
            submitted_at: chrono::Utc::now().to_rfc3339(),
        });

        let payload = serde_json::to_string_pretty(&entries)?;
        self.storage.set(LEADERBOARD_KEY, payload).await?;

        tracing::info!(
            "[FileLeaderboard] Recorded score {} for session {}",
            score,
            session_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_submissions_are_sorted_by_score() {
        let dir = TempDir::new().unwrap();
        let board = FileLeaderboard::new(dir.path());

        board.submit("a", 4, &ScoreStats::default()).await.unwrap();
        board.submit("b", 11, &ScoreStats::default()).await.unwrap();

        let entries = board.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].session_id, "b");
        assert!(dir.path().join("leaderboard.json").exists());
    }
}
