pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod opponent;
pub mod recent;
pub mod round;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod storage;

// Re-export common error type
pub use error::{GameError, Result};
