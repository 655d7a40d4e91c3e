//! Durable key-value storage contract.

use async_trait::async_trait;

use crate::error::Result;

/// Untyped persistent string storage shared across process generations.
///
/// Every operation may fail. Callers in the session core treat a failure as
/// "absent" (reads) or "no-op" (writes) after logging it.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
