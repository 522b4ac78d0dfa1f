//! Process-wide deposit numbering.
//!
//! Every accepted deposit that is not a dry run takes the next number. The
//! counter lives for the lifetime of the process and starts again at zero on
//! restart.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct DepositCounter {
    value: AtomicU64,
}

impl DepositCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering after `value`.
    pub fn starting_at(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }

    /// Claim the next deposit number.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recently claimed number, or zero if none has been claimed.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_returns_post_increment() {
        let counter = DepositCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_current_does_not_claim() {
        let counter = DepositCounter::starting_at(41);
        assert_eq!(counter.current(), 41);
        assert_eq!(counter.current(), 41);
        assert_eq!(counter.next(), 42);
    }
}
