//! Stand-in duel opponent for offline play.

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::opponent::Opponent;
use geoguess_core::round::RoundPayload;
use rand::Rng;

/// Solves on a random attempt, or misses the round entirely.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedOpponent {
    max_attempts: u32,
}

impl SimulatedOpponent {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

#[async_trait]
impl Opponent for SimulatedOpponent {
    async fn play_round(&self, round: &RoundPayload) -> Result<Option<u32>> {
        // One extra outcome stands for "never got it".
        let roll = rand::thread_rng().gen_range(1..=self.max_attempts + 1);
        let attempt = (roll <= self.max_attempts).then_some(roll);
        tracing::debug!(
            "[SimulatedOpponent] Round {} solved on {:?}",
            round.id,
            attempt
        );
        Ok(attempt)
    }
}
