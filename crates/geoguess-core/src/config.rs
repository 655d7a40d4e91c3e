use serde::{Deserialize, Serialize};

const HOUR_MS: i64 = 60 * 60 * 1000;

/// Tunables for a session screen, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Rounds in one session before the summary is shown.
    pub session_length: u32,
    /// Wrong guesses allowed before a round fails open.
    pub max_attempts: u32,
    /// Snapshots older than this are purged instead of restored.
    pub snapshot_max_age_hours: u32,
    /// Delay between the final round's feedback and the summary.
    pub summary_delay_ms: u64,
    /// How many recent countries to avoid repeating.
    pub recent_window: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            session_length: 10,
            max_attempts: 3,
            snapshot_max_age_hours: 8,
            summary_delay_ms: 1200,
            recent_window: 20,
        }
    }
}

impl GameConfig {
    pub fn snapshot_max_age_ms(&self) -> i64 {
        i64::from(self.snapshot_max_age_hours) * HOUR_MS
    }

    pub fn summary_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.summary_delay_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub game: GameConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.session_length, 10);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.snapshot_max_age_ms(), 8 * 60 * 60 * 1000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let root: RootConfig = toml::from_str("[game]\nsession_length = 5\n").unwrap();
        assert_eq!(root.game.session_length, 5);
        assert_eq!(root.game.snapshot_max_age_hours, 8);

        let empty: RootConfig = toml::from_str("").unwrap();
        assert_eq!(empty, RootConfig::default());
    }
}
