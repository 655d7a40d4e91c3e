//! AI opponent contract for the duel screen.

use async_trait::async_trait;

use crate::error::Result;
use crate::round::RoundPayload;

/// The opaque opponent backend.
#[async_trait]
pub trait Opponent: Send + Sync {
    /// Plays `round` and returns the 1-based attempt the opponent solved it
    /// on, or `None` if it failed.
    async fn play_round(&self, round: &RoundPayload) -> Result<Option<u32>>;
}
