//! TTL-aware snapshot persistence on top of untyped key-value storage.
//!
//! Nothing in here returns an error to the caller. Losing a snapshot must not
//! crash a session, so storage failures are logged and downgraded: writes
//! become no-ops and reads become "not found".

use std::sync::Arc;

use geoguess_core::clock::Clock;
use geoguess_core::snapshot::{SAVED_AT_FIELD, SnapshotRecord};
use geoguess_core::storage::KeyValueStorage;
use serde_json::Value;

/// Why a stored record was not restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Unparseable,
    MissingTimestamp,
    Expired,
    Malformed,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Rejection::Unparseable => "not valid JSON",
            Rejection::MissingTimestamp => "missing savedAt",
            Rejection::Expired => "expired",
            Rejection::Malformed => "malformed record",
        };
        f.write_str(reason)
    }
}

/// Durable snapshot persistence with TTL semantics.
#[derive(Clone)]
pub struct SnapshotStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
}

impl SnapshotStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Writes `value` under `key` with `savedAt` set to now.
    ///
    /// Idempotent. Failures are logged, never returned.
    pub async fn save<T: SnapshotRecord>(&self, key: &str, value: &T) {
        let mut json = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::error!("[SnapshotStore] Refusing to save non-object record for '{}'", key);
                return;
            }
            Err(e) => {
                tracing::error!("[SnapshotStore] Failed to serialize '{}': {}", key, e);
                return;
            }
        };
        json.insert(
            SAVED_AT_FIELD.to_string(),
            Value::from(self.clock.now_millis()),
        );

        let payload = Value::Object(json).to_string();
        match self.storage.set(key, payload).await {
            Ok(()) => tracing::debug!("[SnapshotStore] Saved '{}'", key),
            Err(e) => tracing::warn!("[SnapshotStore] Failed to save '{}': {}", key, e),
        }
    }

    /// Deletes `key`. Missing keys and storage failures are both no-ops.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            tracing::warn!("[SnapshotStore] Failed to remove '{}': {}", key, e);
        }
    }

    /// Reads `key` back if it is present, well-formed and no older than `max_age_ms`.
    ///
    /// Anything else is reported as not found and the stored value is deleted,
    /// so a stale or corrupt record is never partially restored.
    pub async fn try_restore<T: SnapshotRecord>(&self, key: &str, max_age_ms: i64) -> Option<T> {
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("[SnapshotStore] Failed to read '{}': {}", key, e);
                return None;
            }
        };

        match self.decode(&raw, max_age_ms) {
            Ok(value) => Some(value),
            Err(rejection) => {
                tracing::info!("[SnapshotStore] Discarding '{}': {}", key, rejection);
                self.remove(key).await;
                None
            }
        }
    }

    fn decode<T: SnapshotRecord>(&self, raw: &str, max_age_ms: i64) -> Result<T, Rejection> {
        let value: Value = serde_json::from_str(raw).map_err(|_| Rejection::Unparseable)?;

        let saved_at = value
            .get(SAVED_AT_FIELD)
            .and_then(Value::as_i64)
            .ok_or(Rejection::MissingTimestamp)?;

        // An age that does not fit in i64 can only come from a corrupt timestamp.
        match self.clock.now_millis().checked_sub(saved_at) {
            Some(age) if age > max_age_ms => return Err(Rejection::Expired),
            Some(_) => {}
            None => return Err(Rejection::Malformed),
        }

        T::from_stored(&value).ok_or(Rejection::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStorage;
    use async_trait::async_trait;
    use geoguess_core::clock::ManualClock;
    use geoguess_core::error::{GameError, Result};
    use geoguess_core::round::{Country, RoundPayload};
    use geoguess_core::session::ScoreStats;
    use geoguess_core::snapshot::{SNAPSHOT_VERSION, ScreenKind, SessionSnapshot};

    const HOUR: i64 = 60 * 60 * 1000;
    const KEY: &str = "geoguess.session.classic";

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            screen: ScreenKind::Classic,
            round: RoundPayload::new("r1", Country::new("Chile", "CL")),
            guess_count: 2,
            incorrect_guesses: vec!["peru".into(), "bolivia".into()],
            score: 7,
            high_score: 12,
            round_index: 4,
            completed_rounds: 3,
            next_round: None,
            summary_shown: false,
            session_id: Some("abc".into()),
            submit_to_leaderboard: true,
            continued: false,
            round_outcome: None,
            opponent_score: 0,
            stats: ScoreStats::default(),
        }
    }

    fn store_at(start: i64) -> (SnapshotStore, InMemoryKeyValueStorage, ManualClock) {
        let storage = InMemoryKeyValueStorage::new();
        let clock = ManualClock::new(start);
        let store = SnapshotStore::new(Arc::new(storage.clone()), Arc::new(clock.clone()));
        (store, storage, clock)
    }

    #[tokio::test]
    async fn test_fresh_snapshot_round_trips() {
        let (store, _, clock) = store_at(1_000_000);
        store.save(KEY, &snapshot()).await;
        clock.advance(8 * HOUR);

        let restored: Option<SessionSnapshot> = store.try_restore(KEY, 8 * HOUR).await;
        assert_eq!(restored, Some(snapshot()));
    }

    #[tokio::test]
    async fn test_expired_snapshot_is_purged() {
        let (store, storage, clock) = store_at(1_000_000);
        store.save(KEY, &snapshot()).await;
        clock.advance(9 * HOUR);

        let restored: Option<SessionSnapshot> = store.try_restore(KEY, 8 * HOUR).await;
        assert!(restored.is_none());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_saved_at_is_merged_into_record() {
        let (store, storage, _) = store_at(42);
        store.save(KEY, &snapshot()).await;

        let raw = storage.get(KEY).await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["savedAt"], 42);
        assert_eq!(value["score"], 7);
    }

    #[tokio::test]
    async fn test_missing_timestamp_and_garbage_are_purged() {
        let (store, storage, _) = store_at(0);

        let mut value = serde_json::to_value(snapshot()).unwrap();
        value.as_object_mut().unwrap().remove("savedAt");
        storage.set(KEY, value.to_string()).await.unwrap();
        assert!(store.try_restore::<SessionSnapshot>(KEY, HOUR).await.is_none());
        assert!(!storage.contains_key(KEY).await);

        storage.set(KEY, "{not json".to_string()).await.unwrap();
        assert!(store.try_restore::<SessionSnapshot>(KEY, HOUR).await.is_none());
        assert!(!storage.contains_key(KEY).await);

        storage
            .set(KEY, r#"{"savedAt": 0, "screen": "classic"}"#.to_string())
            .await
            .unwrap();
        assert!(store.try_restore::<SessionSnapshot>(KEY, HOUR).await.is_none());
        assert!(!storage.contains_key(KEY).await);
    }

    #[tokio::test]
    async fn test_out_of_range_timestamp_is_purged() {
        let (store, storage, _) = store_at(1_000_000);

        let mut value = serde_json::to_value(snapshot()).unwrap();
        value["savedAt"] = Value::from(i64::MIN);
        storage.set(KEY, value.to_string()).await.unwrap();

        assert!(store.try_restore::<SessionSnapshot>(KEY, 8 * HOUR).await.is_none());
        assert!(!storage.contains_key(KEY).await);
    }

    #[tokio::test]
    async fn test_absent_key_is_not_found() {
        let (store, _, _) = store_at(0);
        assert!(store.try_restore::<SessionSnapshot>(KEY, HOUR).await.is_none());
        store.remove(KEY).await;
    }

    struct BrokenStorage;

    #[async_trait]
    impl KeyValueStorage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(GameError::storage("disk on fire"))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(GameError::storage("disk on fire"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(GameError::storage("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let store = SnapshotStore::new(Arc::new(BrokenStorage), Arc::new(ManualClock::new(0)));
        store.save(KEY, &snapshot()).await;
        store.remove(KEY).await;
        assert!(store.try_restore::<SessionSnapshot>(KEY, HOUR).await.is_none());
    }
}
