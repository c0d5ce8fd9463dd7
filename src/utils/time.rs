//! Time source used by [`Stats`](crate::disruptor::stats::Stats).
//!
//! The disruptor never reads the wall clock directly; every timestamp comes
//! through an injected [`TimeFn`] so tests can supply a deterministic clock.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A zero-argument function returning a real-valued seconds timestamp.
/// Monotonic is preferred but not required — it is only used for stats.
pub type TimeFn = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Wall-clock seconds since the Unix epoch, as an `f64`.
pub fn wall_clock_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Default time source, used when a `DisruptorConfig` does not supply one.
pub fn default_time_fn() -> TimeFn {
    Arc::new(wall_clock_secs)
}
