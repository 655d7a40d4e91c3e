//! Cancellable delay before the end-of-session summary is shown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

/// A single re-armable timer.
///
/// Arming replaces any pending timer. Cancelling (on background or
/// teardown) guarantees a stale timer never fires after resume.
#[derive(Debug, Default)]
pub struct SummaryTimer {
    handle: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl SummaryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, delay: Duration) {
        self.cancel();
        let fired = Arc::new(AtomicBool::new(false));
        self.fired = Arc::clone(&fired);
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fired.store(true, Ordering::SeqCst);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.fired.store(false, Ordering::SeqCst);
    }

    /// True while armed and not yet consumed.
    pub fn is_armed(&self) -> bool {
        self.handle.is_some() || self.fired.load(Ordering::SeqCst)
    }

    /// Returns true once after the delay has elapsed, then disarms.
    pub fn take_fired(&mut self) -> bool {
        if self.fired.swap(false, Ordering::SeqCst) {
            self.handle = None;
            true
        } else {
            false
        }
    }

    /// Waits until the armed delay elapses. Returns immediately when not armed.
    pub async fn elapsed(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.await;
            self.handle = None;
        }
    }
}

impl Drop for SummaryTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let mut timer = SummaryTimer::new();
        timer.arm(Duration::from_millis(500));
        assert!(!timer.take_fired());

        timer.elapsed().await;
        assert!(timer.take_fired());
        assert!(!timer.is_armed());
        assert!(!timer.take_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let mut timer = SummaryTimer::new();
        timer.arm(Duration::from_millis(500));
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!timer.take_fired());
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_discards_previous() {
        let mut timer = SummaryTimer::new();
        timer.arm(Duration::from_millis(100));
        timer.arm(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!timer.take_fired());
    }
}
