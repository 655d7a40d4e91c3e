//! Error types for the geoguess session core.

use thiserror::Error;

/// A shared error type for the session core.
///
/// Storage and malformed-snapshot failures are normally downgraded to
/// "absent" before they reach a caller; the variants that do surface are
/// round-fetch failures, submission failures and misuse of the state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Durable key-value storage failed (read, write or delete).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A persisted document could not be encoded or decoded.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The round source failed or had nothing to serve.
    #[error("Round unavailable: {0}")]
    RoundUnavailable(String),

    /// The session registrar could not start a session.
    #[error("Session registration failed: {0}")]
    Registration(String),

    /// The leaderboard rejected or failed to receive a score.
    #[error("Score submission failed: {0}")]
    Submission(String),

    /// The opponent backend failed to play a round.
    #[error("Opponent error: {0}")]
    Opponent(String),

    /// An operation was invoked in a phase that does not allow it.
    #[error("Invalid transition: cannot {operation} while {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: String,
    },

    /// A guess was empty after normalization.
    #[error("Invalid guess: {0}")]
    InvalidGuess(String),

    /// Unusable configuration or paths.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Broken internal invariant.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn round_unavailable(message: impl Into<String>) -> Self {
        Self::RoundUnavailable(message.into())
    }

    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates an InvalidTransition error for `operation` attempted in `phase`.
    pub fn invalid_transition(operation: &'static str, phase: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            operation,
            phase: phase.to_string(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Storage-class failures are always downgraded to "absent".
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io { .. } | Self::Serialization { .. }
        )
    }

    pub fn is_round_unavailable(&self) -> bool {
        matches!(self, Self::RoundUnavailable(_))
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for GameError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, GameError>`.
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_is_storage_class() {
        let err: GameError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_storage());
        assert!(!err.is_round_unavailable());
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = GameError::invalid_transition("advance", "AwaitingInput");
        assert!(err.is_invalid_transition());
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot advance while AwaitingInput"
        );
    }
}
