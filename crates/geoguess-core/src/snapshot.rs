//! Persisted session snapshot schema.
//!
//! The snapshot lives in untyped key-value storage shared across process
//! generations, so it is never decoded trust-on-read. [`SnapshotRecord::from_stored`]
//! validates each field on its own and falls back to a type-appropriate
//! default when one is missing or garbled. Only the core round payload is
//! mandatory: without it there is no session to resume.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::round::{Country, RoundPayload};
use crate::session::ScoreStats;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Field name the snapshot store merges into every persisted record.
pub const SAVED_AT_FIELD: &str = "savedAt";

/// A record that can be written to and defensively read back from the snapshot store.
pub trait SnapshotRecord: Serialize + Sized {
    /// Rebuilds the record from a stored JSON value.
    ///
    /// Returns `None` when the value is not usable at all.
    fn from_stored(value: &Value) -> Option<Self>;
}

/// The screens that own a resumable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    /// Single-player rounds.
    Classic,
    /// Rounds played against the AI opponent.
    Duel,
    /// Panorama rounds.
    Panorama,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 3] = [ScreenKind::Classic, ScreenKind::Duel, ScreenKind::Panorama];

    /// Storage key owned by this screen. Screens never read each other's key.
    pub fn storage_key(&self) -> &'static str {
        match self {
            ScreenKind::Classic => "geoguess.session.classic",
            ScreenKind::Duel => "geoguess.session.duel",
            ScreenKind::Panorama => "geoguess.session.panorama",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenKind::Classic => "classic",
            ScreenKind::Duel => "duel",
            ScreenKind::Panorama => "panorama",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(ScreenKind::Classic),
            "duel" => Ok(ScreenKind::Duel),
            "panorama" => Ok(ScreenKind::Panorama),
            other => Err(format!("unknown screen kind '{}'", other)),
        }
    }
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoundOutcome {
    /// Guessed correctly; `points` were applied.
    Solved { points: i32 },
    /// Attempts exhausted; `penalty` points were removed (0 unless continued).
    Failed { penalty: i32 },
}

impl RoundOutcome {
    /// Net change to the running score.
    pub fn score_delta(&self) -> i32 {
        match self {
            RoundOutcome::Solved { points } => *points,
            RoundOutcome::Failed { penalty } => -*penalty,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, RoundOutcome::Solved { .. })
    }
}

/// Everything needed to resume a screen's session exactly where it left off.
///
/// `savedAt` is not part of the struct; the snapshot store merges it in on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    pub screen: ScreenKind,
    /// The active round. Always present: a session without a round is not persisted.
    pub round: RoundPayload,
    /// Attempts used on the active round.
    pub guess_count: u32,
    pub incorrect_guesses: Vec<String>,
    pub score: i32,
    pub high_score: i32,
    /// 1-based index of the active round within the current run.
    pub round_index: u32,
    pub completed_rounds: u32,
    /// Prefetched round waiting to be played next.
    pub next_round: Option<RoundPayload>,
    pub summary_shown: bool,
    /// `None` when the registrar was unreachable (offline session).
    pub session_id: Option<String>,
    pub submit_to_leaderboard: bool,
    /// Set once the player continued past the summary.
    pub continued: bool,
    /// `None` while the active round is still being played.
    pub round_outcome: Option<RoundOutcome>,
    /// AI opponent's running score (duel screen only).
    pub opponent_score: i32,
    /// Accumulated statistics submitted with the score.
    pub stats: ScoreStats,
}

impl SessionSnapshot {
    pub fn is_round_over(&self) -> bool {
        self.round_outcome.is_some()
    }
}

impl SnapshotRecord for SessionSnapshot {
    fn from_stored(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let version = read_u32(obj, "version").unwrap_or(SNAPSHOT_VERSION);
        if version > SNAPSHOT_VERSION {
            tracing::debug!("[SessionSnapshot] Rejecting newer schema version {}", version);
            return None;
        }

        let Some(screen) = obj
            .get("screen")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ScreenKind>().ok())
        else {
            tracing::debug!("[SessionSnapshot] Missing or unknown screen");
            return None;
        };

        let Some(round) = obj.get("round").and_then(read_round) else {
            tracing::debug!("[SessionSnapshot] Missing or invalid round");
            return None;
        };

        let round_outcome = obj
            .get("roundOutcome")
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value::<RoundOutcome>(v.clone()).ok());

        Some(Self {
            version,
            screen,
            round,
            guess_count: read_u32(obj, "guessCount").unwrap_or(0),
            incorrect_guesses: read_string_vec(obj, "incorrectGuesses"),
            score: read_i32(obj, "score").unwrap_or(0),
            high_score: read_i32(obj, "highScore").unwrap_or(0),
            round_index: read_u32(obj, "roundIndex").unwrap_or(1).max(1),
            completed_rounds: read_u32(obj, "completedRounds").unwrap_or(0),
            next_round: obj.get("nextRound").and_then(read_round),
            summary_shown: read_bool(obj, "summaryShown").unwrap_or(false),
            session_id: obj
                .get("sessionId")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            submit_to_leaderboard: read_bool(obj, "submitToLeaderboard").unwrap_or(true),
            continued: read_bool(obj, "continued").unwrap_or(false),
            round_outcome,
            opponent_score: read_i32(obj, "opponentScore").unwrap_or(0),
            stats: obj
                .get("stats")
                .and_then(|v| serde_json::from_value::<ScoreStats>(v.clone()).ok())
                .unwrap_or_default(),
        })
    }
}

// ============================================================================
// Field readers
// ============================================================================

fn read_u32(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn read_i32(obj: &Map<String, Value>, key: &str) -> Option<i32> {
    obj.get(key)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
}

fn read_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

fn read_string_vec(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// A round needs a country with both name and code; everything else is optional.
fn read_round(value: &Value) -> Option<RoundPayload> {
    let obj = value.as_object()?;
    let country = obj.get("country")?.as_object()?;
    let name = non_empty_str(country, "name")?;
    let code = non_empty_str(country, "code")?;

    Some(RoundPayload {
        id: obj
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        country: Country::new(name, code),
        image_url: non_empty_str(obj, "imageUrl").map(str::to_string),
        hint: non_empty_str(obj, "hint").map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            screen: ScreenKind::Classic,
            round: RoundPayload::new("r1", Country::new("Peru", "PE")),
            guess_count: 1,
            incorrect_guesses: vec!["chile".to_string()],
            score: 5,
            high_score: 9,
            round_index: 3,
            completed_rounds: 2,
            next_round: Some(RoundPayload::new("r2", Country::new("Japan", "JP"))),
            summary_shown: false,
            session_id: Some("s-1".to_string()),
            submit_to_leaderboard: false,
            continued: true,
            round_outcome: None,
            opponent_score: 0,
            stats: ScoreStats {
                rounds_played: 2,
                rounds_solved: 1,
                first_try_solves: 1,
                continued: true,
            },
        }
    }

    #[test]
    fn test_stored_value_decodes_to_same_snapshot() {
        let snapshot = sample();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        value[SAVED_AT_FIELD] = json!(1_700_000_000_000i64);

        let decoded = SessionSnapshot::from_stored(&value).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_missing_round_is_malformed() {
        let value = json!({ "screen": "classic", "score": 4 });
        assert!(SessionSnapshot::from_stored(&value).is_none());

        let value = json!({ "screen": "classic", "round": { "id": "x", "country": { "name": "", "code": "FR" } } });
        assert!(SessionSnapshot::from_stored(&value).is_none());
    }

    #[test]
    fn test_garbled_fields_fall_back_to_defaults() {
        let value = json!({
            "screen": "duel",
            "round": { "country": { "name": "Kenya", "code": "KE" } },
            "guessCount": "two",
            "incorrectGuesses": ["uganda", 7, null],
            "score": -3,
            "highScore": 1.5,
            "roundIndex": 0,
            "nextRound": { "country": "nope" },
            "summaryShown": "yes",
            "sessionId": "",
            "roundOutcome": { "kind": "exploded" }
        });

        let decoded = SessionSnapshot::from_stored(&value).unwrap();
        assert_eq!(decoded.screen, ScreenKind::Duel);
        assert_eq!(decoded.round.id, "");
        assert_eq!(decoded.guess_count, 0);
        assert_eq!(decoded.incorrect_guesses, vec!["uganda".to_string()]);
        assert_eq!(decoded.score, -3);
        assert_eq!(decoded.high_score, 0);
        assert_eq!(decoded.round_index, 1);
        assert!(decoded.next_round.is_none());
        assert!(!decoded.summary_shown);
        assert!(decoded.session_id.is_none());
        assert!(decoded.submit_to_leaderboard);
        assert!(decoded.round_outcome.is_none());
    }

    #[test]
    fn test_newer_version_or_unknown_screen_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["version"] = json!(SNAPSHOT_VERSION + 1);
        assert!(SessionSnapshot::from_stored(&value).is_none());

        let mut value = serde_json::to_value(sample()).unwrap();
        value["screen"] = json!("menu");
        assert!(SessionSnapshot::from_stored(&value).is_none());
    }

    #[test]
    fn test_round_outcome_wire_format() {
        let value = serde_json::to_value(RoundOutcome::Failed { penalty: 1 }).unwrap();
        assert_eq!(value, json!({ "kind": "failed", "penalty": 1 }));
        assert_eq!(RoundOutcome::Failed { penalty: 1 }.score_delta(), -1);
        assert_eq!(RoundOutcome::Solved { points: 2 }.score_delta(), 2);
    }

    #[test]
    fn test_screen_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            ScreenKind::ALL.iter().map(|s| s.storage_key()).collect();
        assert_eq!(keys.len(), ScreenKind::ALL.len());
        assert_eq!("Panorama".parse::<ScreenKind>(), Ok(ScreenKind::Panorama));
    }
}
