pub mod catalog_round_source;
pub mod config_service;
pub mod file_leaderboard;
pub mod local_registrar;
pub mod logging;
pub mod paths;
pub mod simulated_opponent;
pub mod snapshot_store;
pub mod storage;

pub use crate::catalog_round_source::CatalogRoundSource;
pub use crate::config_service::ConfigService;
pub use crate::file_leaderboard::FileLeaderboard;
pub use crate::local_registrar::LocalSessionRegistrar;
pub use crate::simulated_opponent::SimulatedOpponent;
pub use crate::snapshot_store::SnapshotStore;
pub use crate::storage::{FileKeyValueStorage, InMemoryKeyValueStorage};
