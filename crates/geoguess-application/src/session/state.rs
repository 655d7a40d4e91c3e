//! In-memory session state and the phase enum the UI renders from.

use std::fmt;

use geoguess_core::round::{Country, RoundPayload};
use geoguess_core::session::ScoreStats;
use geoguess_core::snapshot::{RoundOutcome, SNAPSHOT_VERSION, ScreenKind, SessionSnapshot};

/// Where a screen's session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Restoring or starting a session; input disabled.
    Bootstrapping,
    /// A round is on screen and accepts guesses.
    AwaitingInput,
    /// A guess is being checked; input disabled.
    Evaluating,
    /// The round is over and its result is on screen.
    RoundComplete,
    /// The summary is visible.
    SessionComplete,
    /// The user left on purpose. Terminal.
    Abandoned,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Mutable state of one screen's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub round: Option<RoundPayload>,
    pub guess_count: u32,
    pub incorrect_guesses: Vec<String>,
    pub score: i32,
    pub high_score: i32,
    pub round_index: u32,
    pub completed_rounds: u32,
    pub summary_shown: bool,
    pub session_id: Option<String>,
    pub submit_to_leaderboard: bool,
    pub continued: bool,
    pub round_outcome: Option<RoundOutcome>,
    pub opponent_score: i32,
    pub stats: ScoreStats,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            round: None,
            guess_count: 0,
            incorrect_guesses: Vec::new(),
            score: 0,
            high_score: 0,
            round_index: 0,
            completed_rounds: 0,
            summary_shown: false,
            session_id: None,
            submit_to_leaderboard: true,
            continued: false,
            round_outcome: None,
            opponent_score: 0,
            stats: ScoreStats::default(),
        }
    }
}

impl SessionState {
    /// The country to reveal once the round is over.
    pub fn revealed_answer(&self) -> Option<&Country> {
        self.round_outcome?;
        self.round.as_ref().map(|r| &r.country)
    }

    pub(crate) fn start_round(&mut self, round: RoundPayload) {
        self.round = Some(round);
        self.guess_count = 0;
        self.incorrect_guesses.clear();
        self.round_outcome = None;
        self.round_index += 1;
    }

    /// Clears everything except the high score and the leaderboard preference.
    pub(crate) fn reset_for_new_game(&mut self) {
        *self = Self {
            high_score: self.high_score,
            submit_to_leaderboard: self.submit_to_leaderboard,
            ..Self::default()
        };
    }

    pub(crate) fn to_snapshot(
        &self,
        screen: ScreenKind,
        next_round: Option<RoundPayload>,
    ) -> Option<SessionSnapshot> {
        let round = self.round.clone()?;
        Some(SessionSnapshot {
            version: SNAPSHOT_VERSION,
            screen,
            round,
            guess_count: self.guess_count,
            incorrect_guesses: self.incorrect_guesses.clone(),
            score: self.score,
            high_score: self.high_score,
            round_index: self.round_index,
            completed_rounds: self.completed_rounds,
            next_round,
            summary_shown: self.summary_shown,
            session_id: self.session_id.clone(),
            submit_to_leaderboard: self.submit_to_leaderboard,
            continued: self.continued,
            round_outcome: self.round_outcome,
            opponent_score: self.opponent_score,
            stats: self.stats.clone(),
        })
    }

    pub(crate) fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            round: Some(snapshot.round),
            guess_count: snapshot.guess_count,
            incorrect_guesses: snapshot.incorrect_guesses,
            score: snapshot.score,
            high_score: snapshot.high_score.max(snapshot.score),
            round_index: snapshot.round_index,
            completed_rounds: snapshot.completed_rounds,
            summary_shown: snapshot.summary_shown,
            session_id: snapshot.session_id,
            submit_to_leaderboard: snapshot.submit_to_leaderboard,
            continued: snapshot.continued,
            round_outcome: snapshot.round_outcome,
            opponent_score: snapshot.opponent_score,
            stats: snapshot.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_requires_round() {
        let state = SessionState::default();
        assert!(state.to_snapshot(ScreenKind::Classic, None).is_none());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_state() {
        let mut state = SessionState {
            score: 6,
            high_score: 10,
            session_id: Some("s".into()),
            ..SessionState::default()
        };
        state.start_round(RoundPayload::new("r", Country::new("Peru", "PE")));
        state.incorrect_guesses.push("chile".into());
        state.guess_count = 1;

        let snapshot = state.to_snapshot(ScreenKind::Panorama, None).unwrap();
        assert_eq!(snapshot.round_index, 1);
        assert_eq!(SessionState::from_snapshot(snapshot), state);
    }

    #[test]
    fn test_reset_keeps_high_score_and_preference() {
        let mut state = SessionState {
            score: 4,
            high_score: 9,
            submit_to_leaderboard: false,
            continued: true,
            ..SessionState::default()
        };
        state.reset_for_new_game();

        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 9);
        assert!(!state.submit_to_leaderboard);
        assert!(!state.continued);
    }

    #[test]
    fn test_answer_hidden_until_round_over() {
        let mut state = SessionState::default();
        state.start_round(RoundPayload::new("r", Country::new("Peru", "PE")));
        assert!(state.revealed_answer().is_none());

        state.round_outcome = Some(RoundOutcome::Failed { penalty: 0 });
        assert_eq!(state.revealed_answer().unwrap().code, "PE");
    }
}
