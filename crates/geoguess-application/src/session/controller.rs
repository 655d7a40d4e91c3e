//! Per-screen session state machine.

use std::sync::Arc;

use async_trait::async_trait;
use geoguess_core::config::GameConfig;
use geoguess_core::error::{GameError, Result};
use geoguess_core::navigation::Navigator;
use geoguess_core::opponent::Opponent;
use geoguess_core::recent::RecentRounds;
use geoguess_core::round::{Country, RoundPayload, RoundSource};
use geoguess_core::scoring::{
    CONTINUED_FAILURE_PENALTY, matches_country, normalize_guess, points_for_attempt,
};
use geoguess_core::session::{ScoreSubmitter, SessionRegistrar};
use geoguess_core::snapshot::{RoundOutcome, ScreenKind, SessionSnapshot};
use geoguess_infrastructure::SnapshotStore;

use super::state::{SessionPhase, SessionState};
use crate::lifecycle::LifecycleHandler;
use crate::prefetch::{PrefetchHandle, PrefetchSlot};
use crate::summary_timer::SummaryTimer;
use crate::suppression::SuppressionFlag;

const ROUND_FETCH_ALERT: &str = "Couldn't load a round. Check your connection and try again.";

/// External collaborators a controller talks to.
#[derive(Clone)]
pub struct SessionServices {
    pub rounds: Arc<dyn RoundSource>,
    pub registrar: Arc<dyn SessionRegistrar>,
    pub submitter: Arc<dyn ScoreSubmitter>,
    pub navigator: Arc<dyn Navigator>,
    /// Only consulted on the duel screen.
    pub opponent: Option<Arc<dyn Opponent>>,
    pub store: SnapshotStore,
}

/// How [`SessionController::bootstrap`] produced its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A fresh-enough snapshot was hydrated.
    Restored,
    /// A new session was started.
    Started,
}

/// Result of one guess submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { points: i32, new_high_score: bool },
    Incorrect { attempts_left: u32 },
    /// Attempts exhausted; the answer is revealed.
    Failed { answer: Country, penalty: i32 },
    /// Same wrong guess as before; no attempt was used.
    Repeated,
}

/// Why a score was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    OptedOut,
    NoScore,
    Offline,
}

/// Outcome of the leaderboard step on "new game" and abandonment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted,
    Skipped(SkipReason),
    /// Shown as a non-blocking warning.
    Failed(String),
}

/// Owns round progression, scoring and persistence for one screen.
pub struct SessionController {
    screen: ScreenKind,
    config: GameConfig,
    services: SessionServices,
    phase: SessionPhase,
    state: SessionState,
    prefetch: PrefetchSlot<RoundPayload>,
    pending_prefetch: Option<PrefetchHandle>,
    recent: RecentRounds,
    suppression: SuppressionFlag,
    summary_timer: SummaryTimer,
    alert: Option<String>,
}

impl SessionController {
    pub fn new(screen: ScreenKind, config: GameConfig, services: SessionServices) -> Self {
        let recent = RecentRounds::new(config.recent_window);
        Self {
            screen,
            config,
            services,
            phase: SessionPhase::Bootstrapping,
            state: SessionState::default(),
            prefetch: PrefetchSlot::new(),
            pending_prefetch: None,
            recent,
            suppression: SuppressionFlag::new(),
            summary_timer: SummaryTimer::new(),
            alert: None,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn screen(&self) -> ScreenKind {
        self.screen
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn prefetch(&self) -> &PrefetchSlot<RoundPayload> {
        &self.prefetch
    }

    pub fn suppression(&self) -> &SuppressionFlag {
        &self.suppression
    }

    pub fn recent(&self) -> &RecentRounds {
        &self.recent
    }

    /// Returns the pending user-visible alert once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// The record that would be persisted right now, if any.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.state.to_snapshot(self.screen, self.prefetch.peek())
    }

    pub fn set_submit_to_leaderboard(&mut self, enabled: bool) {
        self.state.submit_to_leaderboard = enabled;
    }

    fn key(&self) -> &'static str {
        self.screen.storage_key()
    }

    fn expect_phase(&self, operation: &'static str, allowed: &[SessionPhase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::invalid_transition(operation, self.phase))
        }
    }

    // ============================================================================
    // Bootstrapping
    // ============================================================================

    /// Restores the persisted session or starts a new one.
    ///
    /// On a round-fetch failure the controller stays in `Bootstrapping` with
    /// an alert set; calling `bootstrap` again retries.
    pub async fn bootstrap(&mut self) -> Result<BootstrapOutcome> {
        self.expect_phase("bootstrap", &[SessionPhase::Bootstrapping])?;

        if self.restore().await {
            return Ok(BootstrapOutcome::Restored);
        }

        self.start_fresh().await?;
        Ok(BootstrapOutcome::Started)
    }

    async fn start_fresh(&mut self) -> Result<()> {
        if self.state.session_id.is_none() {
            self.state.session_id = match self.services.registrar.start_session(self.screen).await {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(
                        "[SessionController:{}] Session registration failed, playing offline: {}",
                        self.screen,
                        e
                    );
                    None
                }
            };
        }

        let round = self.obtain_round().await?;
        self.state.round_index = 0;
        self.install_round(round);
        tracing::info!(
            "[SessionController:{}] Started session {:?}",
            self.screen,
            self.state.session_id
        );
        Ok(())
    }

    /// Hydrates from the snapshot store. Returns false when nothing usable was stored.
    async fn restore(&mut self) -> bool {
        let Some(snapshot) = self
            .services
            .store
            .try_restore::<SessionSnapshot>(self.key(), self.config.snapshot_max_age_ms())
            .await
        else {
            return false;
        };
        // Restored snapshots are consumed.
        self.services.store.remove(self.key()).await;

        if snapshot.screen != self.screen {
            tracing::warn!(
                "[SessionController:{}] Ignoring snapshot written by {}",
                self.screen,
                snapshot.screen
            );
            return false;
        }

        let next_round = snapshot.next_round.clone();
        self.summary_timer.cancel();
        self.state = SessionState::from_snapshot(snapshot);
        if let Some(round) = &self.state.round {
            self.recent.push(&round.country.code);
        }

        self.phase = match self.state.round_outcome {
            None => SessionPhase::AwaitingInput,
            Some(_) if self.session_finished() => {
                // The summary timer never survives a restore; show it now.
                self.state.summary_shown = true;
                SessionPhase::SessionComplete
            }
            Some(_) => SessionPhase::RoundComplete,
        };

        match next_round {
            Some(next) => {
                self.recent.push(&next.country.code);
                self.prefetch.prime(next);
            }
            None if self.phase != SessionPhase::SessionComplete => self.begin_prefetch(),
            None => {}
        }

        tracing::info!(
            "[SessionController:{}] Restored round {} ({} completed, score {})",
            self.screen,
            self.state.round_index,
            self.state.completed_rounds,
            self.state.score
        );
        true
    }

    // ============================================================================
    // Rounds
    // ============================================================================

    /// Takes the prefetched round, or fetches one now if none is ready.
    async fn obtain_round(&mut self) -> Result<RoundPayload> {
        if let Some(round) = self.prefetch.consume() {
            return Ok(round);
        }

        let exclude = self.recent.to_vec();
        let result = match self.services.rounds.fetch_round(&exclude).await {
            Ok(Some(round)) => Ok(round),
            Ok(None) => Err(GameError::round_unavailable("round source returned nothing")),
            Err(e) => Err(GameError::round_unavailable(e.to_string())),
        };

        if let Err(e) = &result {
            tracing::error!("[SessionController:{}] {}", self.screen, e);
            self.alert = Some(ROUND_FETCH_ALERT.to_string());
        }
        result
    }

    fn install_round(&mut self, round: RoundPayload) {
        self.recent.push(&round.country.code);
        self.state.start_round(round);
        self.phase = SessionPhase::AwaitingInput;
        self.begin_prefetch();
    }

    fn begin_prefetch(&mut self) {
        let rounds = Arc::clone(&self.services.rounds);
        let exclude = self.recent.to_vec();
        self.pending_prefetch = Some(
            self.prefetch
                .begin_fetch(async move { rounds.fetch_round(&exclude).await }),
        );
    }

    /// Waits for the most recent prefetch to resolve.
    pub async fn settle_prefetch(&mut self) {
        if let Some(handle) = self.pending_prefetch.take() {
            handle.wait().await;
        }
    }

    fn session_finished(&self) -> bool {
        self.state.completed_rounds >= self.config.session_length
    }

    // ============================================================================
    // Guessing
    // ============================================================================

    pub async fn submit_guess(&mut self, guess: &str) -> Result<GuessOutcome> {
        self.expect_phase("submit a guess", &[SessionPhase::AwaitingInput])?;

        let normalized = normalize_guess(guess);
        if normalized.is_empty() {
            return Err(GameError::InvalidGuess("guess is empty".to_string()));
        }
        if self
            .state
            .incorrect_guesses
            .iter()
            .any(|previous| normalize_guess(previous) == normalized)
        {
            return Ok(GuessOutcome::Repeated);
        }

        let Some(round) = self.state.round.clone() else {
            return Err(GameError::internal("awaiting input without a round"));
        };

        self.phase = SessionPhase::Evaluating;
        self.state.guess_count += 1;
        let attempt = self.state.guess_count;

        if matches_country(guess, &round.country) {
            let points = points_for_attempt(attempt);
            self.state.score += points;
            let new_high_score = self.state.score > self.state.high_score;
            if new_high_score {
                self.state.high_score = self.state.score;
            }
            self.complete_round(&round, RoundOutcome::Solved { points }, Some(attempt))
                .await;
            return Ok(GuessOutcome::Correct {
                points,
                new_high_score,
            });
        }

        self.state.incorrect_guesses.push(guess.trim().to_string());

        if attempt < self.config.max_attempts {
            self.phase = SessionPhase::AwaitingInput;
            return Ok(GuessOutcome::Incorrect {
                attempts_left: self.config.max_attempts - attempt,
            });
        }

        // Unbounded below once continued.
        let penalty = if self.state.continued {
            CONTINUED_FAILURE_PENALTY
        } else {
            0
        };
        self.state.score -= penalty;
        self.complete_round(&round, RoundOutcome::Failed { penalty }, None)
            .await;
        Ok(GuessOutcome::Failed {
            answer: round.country,
            penalty,
        })
    }

    async fn complete_round(
        &mut self,
        round: &RoundPayload,
        outcome: RoundOutcome,
        solved_on: Option<u32>,
    ) {
        self.state.round_outcome = Some(outcome);
        self.state.completed_rounds += 1;
        self.state.stats.record(solved_on);
        self.phase = SessionPhase::RoundComplete;

        if self.screen == ScreenKind::Duel {
            self.play_opponent(round).await;
        }

        if self.session_finished() {
            self.summary_timer.arm(self.config.summary_delay());
        }
    }

    async fn play_opponent(&mut self, round: &RoundPayload) {
        let Some(opponent) = self.services.opponent.clone() else {
            return;
        };
        match opponent.play_round(round).await {
            Ok(Some(attempt)) => self.state.opponent_score += points_for_attempt(attempt),
            Ok(None) => {}
            Err(e) => tracing::warn!("[SessionController:{}] Opponent failed: {}", self.screen, e),
        }
    }

    // ============================================================================
    // Progression
    // ============================================================================

    /// Moves to the next round of the current session.
    pub async fn advance(&mut self) -> Result<()> {
        self.expect_phase("advance", &[SessionPhase::RoundComplete])?;
        if self.session_finished() {
            return Err(GameError::invalid_transition(
                "advance past the last round",
                self.phase,
            ));
        }

        let round = self.obtain_round().await?;
        self.install_round(round);
        Ok(())
    }

    /// Applies an elapsed summary delay. Returns true when the summary became visible.
    pub fn poll_summary(&mut self) -> bool {
        if self.phase == SessionPhase::RoundComplete && self.summary_timer.take_fired() {
            self.state.summary_shown = true;
            self.phase = SessionPhase::SessionComplete;
            tracing::info!(
                "[SessionController:{}] Session complete with score {}",
                self.screen,
                self.state.score
            );
            return true;
        }
        false
    }

    /// Waits out the summary delay, if one is pending, and applies it.
    pub async fn wait_for_summary(&mut self) -> bool {
        if !self.summary_timer.is_armed() {
            return false;
        }
        self.summary_timer.elapsed().await;
        self.poll_summary()
    }

    /// Keeps playing past the summary. Misses now cost points.
    pub async fn continue_session(&mut self) -> Result<()> {
        self.expect_phase("continue", &[SessionPhase::SessionComplete])?;

        let round = self.obtain_round().await?;
        self.state.completed_rounds = 0;
        self.state.round_index = 0;
        self.state.continued = true;
        self.state.stats.continued = true;
        self.state.summary_shown = false;
        self.install_round(round);
        Ok(())
    }

    /// Submits the score if allowed, then starts over with a new session id.
    ///
    /// If no round can be fetched the controller is left in `Bootstrapping`
    /// with an alert; `bootstrap` retries.
    pub async fn new_game(&mut self) -> Result<SubmissionOutcome> {
        self.expect_phase("start a new game", &[SessionPhase::SessionComplete])?;

        let submission = self.submit_score().await;
        self.summary_timer.cancel();
        self.prefetch.invalidate();
        self.pending_prefetch = None;
        self.state.reset_for_new_game();
        self.phase = SessionPhase::Bootstrapping;

        if let Err(e) = self.start_fresh().await {
            tracing::warn!(
                "[SessionController:{}] New game is waiting for a round: {}",
                self.screen,
                e
            );
        }
        Ok(submission)
    }

    /// Leaves the session on purpose.
    ///
    /// The suppression flag is raised before anything else so the teardown
    /// that navigation triggers does not write the session back.
    pub async fn abandon(&mut self) -> SubmissionOutcome {
        if self.phase == SessionPhase::Abandoned {
            return SubmissionOutcome::Skipped(SkipReason::NoScore);
        }
        self.suppression.set();
        self.summary_timer.cancel();

        let submission = self.submit_score().await;
        self.services.store.remove(self.key()).await;
        self.prefetch.invalidate();
        self.pending_prefetch = None;
        self.phase = SessionPhase::Abandoned;

        tracing::info!("[SessionController:{}] Session abandoned", self.screen);
        self.services.navigator.return_to_menu();
        submission
    }

    async fn submit_score(&self) -> SubmissionOutcome {
        if !self.state.submit_to_leaderboard {
            return SubmissionOutcome::Skipped(SkipReason::OptedOut);
        }
        if self.state.score <= 0 {
            return SubmissionOutcome::Skipped(SkipReason::NoScore);
        }
        let Some(session_id) = &self.state.session_id else {
            return SubmissionOutcome::Skipped(SkipReason::Offline);
        };

        match self
            .services
            .submitter
            .submit(session_id, self.state.score, &self.state.stats)
            .await
        {
            Ok(()) => SubmissionOutcome::Submitted,
            Err(e) => {
                tracing::warn!(
                    "[SessionController:{}] Score submission failed: {}",
                    self.screen,
                    e
                );
                SubmissionOutcome::Failed(e.to_string())
            }
        }
    }

    // ============================================================================
    // Persistence
    // ============================================================================

    /// Writes the current state unless suppressed. Consumes the suppression flag.
    async fn persist_unless_suppressed(&mut self) {
        if self.suppression.consume() {
            tracing::debug!("[SessionController:{}] Persistence suppressed", self.screen);
            return;
        }
        if self.phase == SessionPhase::Abandoned {
            return;
        }
        match self.snapshot() {
            Some(snapshot) => self.services.store.save(self.key(), &snapshot).await,
            None => tracing::debug!("[SessionController:{}] No round to persist", self.screen),
        }
    }
}

#[async_trait]
impl LifecycleHandler for SessionController {
    async fn on_background(&mut self) {
        self.poll_summary();
        self.summary_timer.cancel();
        self.persist_unless_suppressed().await;
    }

    async fn on_foreground(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::Abandoned | SessionPhase::Bootstrapping
        ) {
            return;
        }
        if self.restore().await {
            return;
        }
        // Snapshot gone and the summary timer was cancelled on background.
        if self.phase == SessionPhase::RoundComplete
            && self.session_finished()
            && !self.state.summary_shown
        {
            self.state.summary_shown = true;
            self.phase = SessionPhase::SessionComplete;
            tracing::info!(
                "[SessionController:{}] Session complete with score {}",
                self.screen,
                self.state.score
            );
        }
    }

    async fn on_teardown(&mut self) {
        self.poll_summary();
        self.summary_timer.cancel();
        self.persist_unless_suppressed().await;
        self.prefetch.invalidate();
        self.pending_prefetch = None;
    }
}
