//! App lifecycle plumbing: an explicit event source and the observer that
//! turns its events into persist/restore calls on a screen.

use std::sync::Arc;

use async_trait::async_trait;
use geoguess_core::lifecycle::{AppStateChange, LifecycleEvent};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

const HUB_CAPACITY: usize = 32;

/// Anything that can hand out a stream of lifecycle events.
pub trait LifecycleSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent>;
}

/// In-process lifecycle event fan-out.
///
/// The platform shell calls [`emit`](Self::emit) from its OS callbacks.
#[derive(Debug, Clone)]
pub struct LifecycleHub {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl Default for LifecycleHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self { sender }
    }

    /// Publishes an event. Returns how many observers will see it.
    pub fn emit(&self, event: LifecycleEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn app_state(&self, change: AppStateChange) -> usize {
        self.emit(LifecycleEvent::AppState(change))
    }

    pub fn teardown(&self) -> usize {
        self.emit(LifecycleEvent::Teardown)
    }
}

impl LifecycleSource for LifecycleHub {
    fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

/// Reactions a screen provides to lifecycle transitions.
#[async_trait]
pub trait LifecycleHandler: Send + 'static {
    /// App moved to background or became inactive.
    async fn on_background(&mut self);

    /// App returned to the foreground.
    async fn on_foreground(&mut self);

    /// The screen is being destroyed.
    async fn on_teardown(&mut self);
}

/// Cancellation handle for an attached observer.
///
/// Dropping it stops observation as well.
pub struct LifecycleSubscription {
    task: Option<JoinHandle<()>>,
}

impl LifecycleSubscription {
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Waits for the observer loop to end (after a teardown event or once the
    /// source goes away).
    pub async fn closed(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for LifecycleSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Routes lifecycle events to a handler, one at a time and in order.
pub struct LifecycleObserver;

impl LifecycleObserver {
    /// Subscribes `handler` to `source`.
    ///
    /// Each event is fully handled (including its storage I/O) before the
    /// next one is looked at. A teardown event ends the subscription.
    pub fn attach<S, H>(source: &S, handler: Arc<Mutex<H>>) -> LifecycleSubscription
    where
        S: LifecycleSource + ?Sized,
        H: LifecycleHandler,
    {
        let mut events = source.subscribe();

        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[LifecycleObserver] Missed {} lifecycle events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                tracing::debug!("[LifecycleObserver] {:?}", event);
                let mut handler = handler.lock().await;
                match event {
                    LifecycleEvent::AppState(change) if change.is_leaving_foreground() => {
                        handler.on_background().await;
                    }
                    LifecycleEvent::AppState(_) => handler.on_foreground().await,
                    LifecycleEvent::Teardown => {
                        handler.on_teardown().await;
                        break;
                    }
                }
            }
        });

        LifecycleSubscription { task: Some(task) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    #[async_trait]
    impl LifecycleHandler for Recorder {
        async fn on_background(&mut self) {
            self.calls.push("background");
        }

        async fn on_foreground(&mut self) {
            self.calls.push("foreground");
        }

        async fn on_teardown(&mut self) {
            self.calls.push("teardown");
        }
    }

    #[tokio::test]
    async fn test_events_are_routed_in_order() {
        let hub = LifecycleHub::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let subscription = LifecycleObserver::attach(&hub, recorder.clone());

        hub.app_state(AppStateChange::Inactive);
        hub.app_state(AppStateChange::Active);
        hub.app_state(AppStateChange::Background);
        hub.teardown();
        hub.app_state(AppStateChange::Active);

        subscription.closed().await;
        assert_eq!(
            recorder.lock().await.calls,
            vec!["background", "foreground", "background", "teardown"]
        );
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops_delivery() {
        let hub = LifecycleHub::new();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let subscription = LifecycleObserver::attach(&hub, recorder.clone());
        subscription.cancel();

        hub.app_state(AppStateChange::Background);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert!(recorder.lock().await.calls.is_empty());
    }
}
