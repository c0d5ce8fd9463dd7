//! Aggregate counters for produced/consumed throughput, blocked time, and
//! ring lag.
//!
//! Grounded in the teacher's `Metrics`/`MetricsSnapshot` split (one mutable
//! struct behind a lock, one plain-data snapshot struct returned to
//! callers), generalized to the richer per-consumer fields and running-lag
//! average the original Python `DisruptorStats` tracks.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::utils::time::TimeFn;

/// Per-consumer counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumerStats {
    pub blocked_time: f64,
    pub consumed_count: u64,
    pub consumption_time: f64,
}

impl ConsumerStats {
    /// Consumed-per-second; zero if no consumption time has accumulated
    /// yet, rather than dividing by zero.
    pub fn cps(&self) -> f64 {
        if self.consumption_time > 0.0 {
            self.consumed_count as f64 / self.consumption_time
        } else {
            0.0
        }
    }
}

/// Running statistics over sampled lag values (`P − min(Ci)`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LagStats {
    pub current: i64,
    pub max: i64,
    pub running_average: f64,
    pub n_samples: u64,
}

impl LagStats {
    /// Updates `current`/`max` and folds `v` into the incremental running
    /// average: `avg <- (avg * n + v) / (n + 1)`.
    pub fn sample(&mut self, v: i64) {
        self.current = v;
        self.max = self.max.max(v);
        self.running_average =
            (self.running_average * self.n_samples as f64 + v as f64) / (self.n_samples as f64 + 1.0);
        self.n_samples += 1;
    }
}

/// Read-only point-in-time view of [`Stats`], safe to hand to callers
/// outside any lock.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub per_consumer: HashMap<String, ConsumerStats>,
    pub producer_blocked_time: f64,
    pub produced_count: u64,
    pub lag: LagStats,
    pub start_time: f64,
    pub end_time: Option<f64>,
}

impl StatsSnapshot {
    /// Produced-per-second, using `end_time` if the disruptor has closed,
    /// otherwise `now` from the same injected time function.
    pub fn pps(&self, now: f64) -> f64 {
        let elapsed = self.end_time.unwrap_or(now) - self.start_time;
        if elapsed > 0.0 {
            self.produced_count as f64 / elapsed
        } else {
            0.0
        }
    }
}

struct Inner {
    per_consumer: HashMap<String, ConsumerStats>,
    producer_blocked_time: f64,
    produced_count: u64,
    lag: LagStats,
    start_time: f64,
    end_time: Option<f64>,
}

/// Owns all statistics for one `Disruptor`. Lives behind its own lock so
/// workers can update their counters without contending with the ring's
/// Synchronizer mutex.
pub struct Stats {
    time_fn: TimeFn,
    inner: Mutex<Inner>,
}

impl Stats {
    pub fn new(time_fn: TimeFn) -> Self {
        let start_time = time_fn();
        Self {
            time_fn,
            inner: Mutex::new(Inner {
                per_consumer: HashMap::new(),
                producer_blocked_time: 0.0,
                produced_count: 0,
                lag: LagStats::default(),
                start_time,
                end_time: None,
            }),
        }
    }

    pub fn register_consumer(&self, name: &str) {
        self.inner.lock().per_consumer.entry(name.to_string()).or_default();
    }

    pub fn report_consumed(&self, name: &str, count: u64, elapsed: Duration) {
        let mut inner = self.inner.lock();
        let entry = inner.per_consumer.entry(name.to_string()).or_default();
        entry.consumed_count += count;
        entry.consumption_time += elapsed.as_secs_f64();
    }

    pub fn report_consumer_blocked(&self, name: &str, elapsed: Duration) {
        let mut inner = self.inner.lock();
        let entry = inner.per_consumer.entry(name.to_string()).or_default();
        entry.blocked_time += elapsed.as_secs_f64();
    }

    pub fn report_produced(&self, count: u64) {
        self.inner.lock().produced_count += count;
    }

    pub fn report_producer_blocked(&self, elapsed: Duration) {
        self.inner.lock().producer_blocked_time += elapsed.as_secs_f64();
    }

    /// Best-effort lag sample; callers (the producer loop, each consumer
    /// loop) call this opportunistically, never while already holding the
    /// ring's Synchronizer lock waiting on it.
    pub fn sample_lag(&self, v: i64) {
        self.inner.lock().lag.sample(v);
    }

    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.end_time.is_none() {
            inner.end_time = Some((self.time_fn)());
        }
    }

    pub fn now(&self) -> f64 {
        (self.time_fn)()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        StatsSnapshot {
            per_consumer: inner.per_consumer.clone(),
            producer_blocked_time: inner.producer_blocked_time,
            produced_count: inner.produced_count,
            lag: inner.lag,
            start_time: inner.start_time,
            end_time: inner.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn fixed_time_fn(t: f64) -> TimeFn {
        Arc::new(move || t)
    }

    #[test]
    fn lag_running_average_matches_incremental_formula() {
        let mut lag = LagStats::default();
        lag.sample(10);
        lag.sample(20);
        assert_eq!(lag.max, 20);
        assert_eq!(lag.running_average, 15.0);
        assert_eq!(lag.n_samples, 2);
    }

    #[test]
    fn cps_is_zero_with_no_consumption_time() {
        let stats = ConsumerStats::default();
        assert_eq!(stats.cps(), 0.0);
    }

    #[test]
    fn report_consumed_accumulates_per_consumer() {
        let stats = Stats::new(fixed_time_fn(100.0));
        stats.report_consumed("c1", 5, Duration::from_secs(1));
        stats.report_consumed("c1", 5, Duration::from_secs(1));
        let snap = stats.snapshot();
        let c1 = snap.per_consumer.get("c1").unwrap();
        assert_eq!(c1.consumed_count, 10);
        assert_eq!(c1.cps(), 5.0);
    }

    #[test]
    fn pps_uses_end_time_once_closed() {
        let stats = Stats::new(fixed_time_fn(100.0));
        stats.report_produced(100);
        stats.close();
        let snap = stats.snapshot();
        // start_time and end_time are both 100.0 under a fixed clock, so
        // elapsed is zero and pps falls back to zero rather than dividing.
        assert_eq!(snap.pps(999.0), 0.0);
    }
}
