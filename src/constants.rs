//! Tuning constants for the disruptor-lite broadcast ring buffer.

use std::time::Duration;

/// Default capacity when a caller does not specify one explicitly.
pub const DEFAULT_RING_BUFFER_CAPACITY: usize = 1024;

/// Default name assigned to a `Disruptor` when none is given.
pub const DEFAULT_DISRUPTOR_NAME: &str = "disruptor";

/// Default timeout for the two condition variables in the Synchronizer.
/// Purely a liveness backstop: every wake re-checks its predicate, so
/// callers can never observe this value directly.
pub const DEFAULT_AWAIT_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_non_zero() {
        assert!(DEFAULT_RING_BUFFER_CAPACITY > 0);
    }

    #[test]
    fn default_timeout_matches_spec() {
        assert_eq!(DEFAULT_AWAIT_TIMEOUT, Duration::from_secs(5));
    }
}
