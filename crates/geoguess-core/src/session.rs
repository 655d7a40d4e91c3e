//! Session registration and leaderboard contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::snapshot::ScreenKind;

/// Hands out leaderboard session identifiers.
///
/// Best-effort: a failure downgrades the session to offline (play and
/// scoring continue, submission is skipped).
#[async_trait]
pub trait SessionRegistrar: Send + Sync {
    async fn start_session(&self, screen: ScreenKind) -> Result<String>;
}

/// Per-session statistics sent alongside a score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreStats {
    pub rounds_played: u32,
    pub rounds_solved: u32,
    pub first_try_solves: u32,
    pub continued: bool,
}

impl ScoreStats {
    /// Accounts for a finished round. `attempt` is the attempt it was solved on.
    pub fn record(&mut self, solved_on_attempt: Option<u32>) {
        self.rounds_played += 1;
        if let Some(attempt) = solved_on_attempt {
            self.rounds_solved += 1;
            if attempt == 1 {
                self.first_try_solves += 1;
            }
        }
    }
}

/// Submits a finished session's score to the leaderboard.
///
/// Failures are reported to the user and never retried automatically.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    async fn submit(&self, session_id: &str, score: i32, stats: &ScoreStats) -> Result<()>;
}
