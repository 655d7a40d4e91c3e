//! Bounded ring buffer of recently served countries.

use std::collections::VecDeque;

/// Remembers the last `capacity` country codes a session has served.
///
/// Owned by one controller and lent out by reference; there is no
/// process-wide "recently used" cache.
#[derive(Debug, Clone)]
pub struct RecentRounds {
    codes: VecDeque<String>,
    capacity: usize,
}

impl RecentRounds {
    pub fn new(capacity: usize) -> Self {
        Self {
            codes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a code, evicting the oldest entry when full.
    ///
    /// A code already present is moved to the newest position.
    pub fn push(&mut self, code: &str) {
        if self.capacity == 0 {
            return;
        }
        let code = code.to_ascii_uppercase();
        self.codes.retain(|c| *c != code);
        if self.codes.len() == self.capacity {
            self.codes.pop_front();
        }
        self.codes.push_back(code);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    /// Oldest first.
    pub fn to_vec(&self) -> Vec<String> {
        self.codes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }
}
