//! Unified path management for geoguess files.
//!
//! ```text
//! ~/.config/geoguess/          # Config directory
//! └── config.toml              # Game configuration
//!
//! ~/.local/share/geoguess/     # Data directory
//! ├── snapshots/               # One JSON file per screen session key
//! ├── leaderboard.json         # Offline leaderboard
//! └── logs/
//!     └── geoguess.log.YYYY-MM-DD
//! ```
//!
//! A base directory override puts everything under one root (tests, portable installs).

use std::path::PathBuf;

const APP_DIR: &str = "geoguess";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for geoguess_core::GameError {
    fn from(err: PathError) -> Self {
        geoguess_core::GameError::config(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GamePaths {
    base_dir: Option<PathBuf>,
}

impl GamePaths {
    /// Creates a resolver. `base_dir` replaces the platform directories when set.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn snapshots_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("snapshots"))
    }

    pub fn leaderboard_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("leaderboard.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}
