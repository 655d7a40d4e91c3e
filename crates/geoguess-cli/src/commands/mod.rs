pub mod leaderboard;
pub mod paths;
pub mod play;

use std::path::PathBuf;

use geoguess_infrastructure::ConfigService;
use geoguess_infrastructure::paths::GamePaths;

/// `--config` wins over the config file in the resolved config directory.
pub fn config_service(paths: &GamePaths, config: Option<PathBuf>) -> ConfigService {
    match config {
        Some(path) => ConfigService::with_path(Some(path)),
        None => ConfigService::new(paths),
    }
}
