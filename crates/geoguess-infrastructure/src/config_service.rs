//! Game settings loaded from `config.toml`.
//!
//! Loads the root configuration from `config.toml` in the geoguess config
//! directory, writing the defaults there on first run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use geoguess_core::config::{GameConfig, RootConfig};
use geoguess_core::error::Result;

use crate::paths::GamePaths;

/// Loads `config.toml` once and hands out copies of it.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    /// `None` until the first successful read.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the resolved config directory.
    ///
    /// The file is loaded lazily on first access.
    pub fn new(paths: &GamePaths) -> Self {
        let config_path = match paths.config_file() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("[ConfigService] {}; using built-in defaults", e);
                None
            }
        };
        Self::with_path(config_path)
    }

    /// Creates a service reading an explicit file (`--config`).
    pub fn with_path(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the cached settings, reading the file on first use.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match &self.config_path {
            Some(path) => Self::load_config(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "[ConfigService] Failed to load {:?}: {}; using defaults",
                    path,
                    e
                );
                RootConfig::default()
            }),
            None => RootConfig::default(),
        };

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    pub fn game_config(&self) -> GameConfig {
        self.get_config().game
    }

    /// Forgets the cached settings; the next read hits the file again.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            let default_config = RootConfig::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            tracing::info!("[ConfigService] Wrote default configuration to {:?}", path);
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = GamePaths::new(Some(dir.path().to_path_buf()));
        let service = ConfigService::new(&paths);

        assert_eq!(service.get_config(), RootConfig::default());
        assert!(paths.config_file().unwrap().exists());
    }

    #[test]
    fn test_reads_overrides_and_caches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[game]\nsession_length = 4\nsummary_delay_ms = 10\n").unwrap();

        let service = ConfigService::with_path(Some(path.clone()));
        assert_eq!(service.game_config().session_length, 4);

        std::fs::write(&path, "[game]\nsession_length = 6\n").unwrap();
        assert_eq!(service.game_config().session_length, 4);

        service.invalidate_cache();
        assert_eq!(service.game_config().session_length, 6);
    }

    #[test]
    fn test_garbled_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[game\nsession_length = ").unwrap();

        let service = ConfigService::with_path(Some(path));
        assert_eq!(service.game_config(), GameConfig::default());
    }
}
