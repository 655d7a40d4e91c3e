//! One-shot guard that keeps a deliberate exit from persisting the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set between "the user chose to leave" and the teardown/background event
/// that would otherwise snapshot the session. Reading it clears it.
#[derive(Debug, Clone, Default)]
pub struct SuppressionFlag {
    set: Arc<AtomicBool>,
}

impl SuppressionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.set.store(true, Ordering::SeqCst);
    }

    /// Returns whether the flag was set and resets it in the same step.
    pub fn consume(&self) -> bool {
        self.set.swap(false, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_resets() {
        let flag = SuppressionFlag::new();
        assert!(!flag.consume());

        flag.set();
        let shared = flag.clone();
        assert!(shared.is_set());
        assert!(shared.consume());
        assert!(!flag.is_set());
        assert!(!flag.consume());
    }
}
