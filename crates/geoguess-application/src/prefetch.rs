//! Single-item look-ahead cache guarded by monotonic request tokens.
//!
//! Every `begin_fetch` supersedes the ones before it. A fetch may only fill
//! the slot if its token is still the current one when it resolves, so a
//! request that started earlier but finished later can never clobber a newer
//! result.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use geoguess_core::error::Result;
use tokio::task::JoinHandle;

struct SlotState<T> {
    /// Token of the request currently allowed to fill the slot.
    token: u64,
    value: Option<T>,
}

/// What happened to a fetch started with [`PrefetchSlot::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The result was stored in the slot.
    Accepted,
    /// A newer request superseded this one; the result was dropped.
    Stale,
    /// The producer failed or had nothing; the slot was left unchanged.
    Failed,
}

/// Handle to an in-flight fetch.
pub struct PrefetchHandle {
    token: u64,
    join: JoinHandle<FetchStatus>,
}

impl PrefetchHandle {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Waits for the fetch to resolve.
    pub async fn wait(self) -> FetchStatus {
        self.join.await.unwrap_or(FetchStatus::Failed)
    }
}

/// At most one ready unit of future work plus the token allowed to fill it.
pub struct PrefetchSlot<T> {
    state: Arc<Mutex<SlotState<T>>>,
}

impl<T> Clone for PrefetchSlot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for PrefetchSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PrefetchSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState {
                token: 0,
                value: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns and clears the ready value, if any.
    ///
    /// `None` means the caller has to fetch synchronously.
    pub fn consume(&self) -> Option<T> {
        self.lock().value.take()
    }

    /// Puts a known value in the slot under a fresh token.
    ///
    /// Any fetch still in flight becomes stale.
    pub fn prime(&self, value: T) {
        let mut state = self.lock();
        state.token += 1;
        state.value = Some(value);
    }

    /// Drops the ready value and makes every in-flight fetch stale.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.token += 1;
        state.value = None;
    }

    pub fn is_ready(&self) -> bool {
        self.lock().value.is_some()
    }

    pub fn current_token(&self) -> u64 {
        self.lock().token
    }
}

impl<T: Clone> PrefetchSlot<T> {
    /// Clones the ready value without consuming it.
    pub fn peek(&self) -> Option<T> {
        self.lock().value.clone()
    }
}

impl<T: Send + 'static> PrefetchSlot<T> {
    /// Starts a best-effort fetch under a new token.
    ///
    /// The previous ready value is discarded so only the newest request can
    /// ever be observed through [`consume`](Self::consume). Failures are
    /// logged and never reach the caller.
    pub fn begin_fetch<F>(&self, producer: F) -> PrefetchHandle
    where
        F: Future<Output = Result<Option<T>>> + Send + 'static,
    {
        let token = {
            let mut state = self.lock();
            state.token += 1;
            state.value = None;
            state.token
        };

        let state = Arc::clone(&self.state);
        let join = tokio::spawn(async move {
            match producer.await {
                Ok(Some(value)) => {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if state.token == token {
                        state.value = Some(value);
                        FetchStatus::Accepted
                    } else {
                        tracing::debug!(
                            "[PrefetchSlot] Dropping stale result for token {} (current {})",
                            token,
                            state.token
                        );
                        FetchStatus::Stale
                    }
                }
                Ok(None) => {
                    tracing::warn!("[PrefetchSlot] Fetch {} produced nothing", token);
                    FetchStatus::Failed
                }
                Err(e) => {
                    tracing::warn!("[PrefetchSlot] Fetch {} failed: {}", token, e);
                    FetchStatus::Failed
                }
            }
        });

        PrefetchHandle { token, join }
    }
}
