//! Statistics collection for the classification entry point.
//!
//! Counters are plain atomics because classification runs concurrently
//! from any number of execution contexts with no mutual exclusion.

use std::sync::atomic::{AtomicU64, Ordering};

/// Verdict and rewrite counters shared across all invocations.
#[derive(Debug, Default)]
pub struct ClassifyStatistics {
    permitted: AtomicU64,
    blocked: AtomicU64,
    rewritten: AtomicU64,
}

impl ClassifyStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_permit(&self) {
        self.permitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_block(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rewrite(&self) {
        self.rewritten.fetch_add(1, Ordering::Relaxed);
    }

    /// Total packets permitted.
    pub fn permitted(&self) -> u64 {
        self.permitted.load(Ordering::Relaxed)
    }

    /// Total packets blocked.
    pub fn blocked(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }

    /// Total permitted packets whose payload was modified.
    pub fn rewritten(&self) -> u64 {
        self.rewritten.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = ClassifyStatistics::new();

        stats.record_permit();
        stats.record_permit();
        stats.record_block();
        stats.record_rewrite();

        assert_eq!(stats.permitted(), 2);
        assert_eq!(stats.blocked(), 1);
        assert_eq!(stats.rewritten(), 1);
    }
}
