//! Lifecycle owner: wires the RingBuffer, Synchronizer, Stats, and
//! ConsumerWorkers together and enforces the backpressure invariant on the
//! producer side.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::disruptor::config::DisruptorConfig;
use crate::disruptor::consumer::{ConsumerCallback, ConsumerWorker, ErrorHandler};
use crate::disruptor::ring_buffer::RingBuffer;
use crate::disruptor::synchronizer::{ConsumerCursor, Synchronizer};
use crate::disruptor::stats::{Stats, StatsSnapshot};
use crate::error::{DisruptorError, Result};

/// Opaque handle returned by [`Disruptor::register_consumer`]. The worker
/// itself is owned internally and joined automatically by `close()`; this
/// handle only identifies which registration it came from.
pub struct ConsumerHandle {
    pub name: String,
}

/// Multi-producer / multi-consumer broadcast ring buffer. Every registered
/// consumer observes every element published after its registration, in
/// publication order; producers block when the slowest consumer has fallen
/// behind by a full buffer's worth of elements.
pub struct Disruptor<T> {
    name: String,
    sync: Arc<Synchronizer<T>>,
    stats: Arc<Stats>,
    error_handler: Option<ErrorHandler<T>>,
    default_timeout: Duration,
    workers: Mutex<Vec<ConsumerWorker>>,
}

impl<T: Clone + Send + 'static> Disruptor<T> {
    pub fn new(config: DisruptorConfig<T>) -> Result<Self> {
        config.validate()?;
        let name = config.name().to_string();
        let capacity = config.capacity();
        tracing::debug!(disruptor = %name, capacity, "constructing disruptor");

        Ok(Self {
            name,
            sync: Arc::new(Synchronizer::new(RingBuffer::new(capacity))),
            stats: Arc::new(Stats::new(config.time_fn())),
            error_handler: config.error_handler(),
            default_timeout: config.default_timeout(),
            workers: Mutex::new(Vec::new()),
        })
    }

    /// Registers a new consumer, joining at the current producer sequence
    /// (no backfill of the historical backlog). Fails with `Stopped` once
    /// the disruptor has begun closing.
    pub fn register_consumer(
        &self,
        name: impl Into<String>,
        consumer: Box<dyn ConsumerCallback<T>>,
    ) -> Result<ConsumerHandle> {
        let name = name.into();

        let index = self.sync.with_lock(|state| {
            if !state.running {
                return None;
            }
            let idx = state.consumers.len();
            state.consumers.push(ConsumerCursor { name: name.clone(), seq: state.producer_seq, draining: false });
            Some(idx)
        });

        let Some(index) = index else {
            return Err(DisruptorError::stopped(self.name.as_str()));
        };

        self.stats.register_consumer(&name);
        tracing::info!(disruptor = %self.name, consumer = %name, joined_at = index, "consumer registered");

        let worker = ConsumerWorker::spawn(
            name.clone(),
            index,
            self.sync.clone(),
            self.stats.clone(),
            consumer,
            self.error_handler.clone(),
            self.default_timeout,
        );
        self.workers.lock().push(worker);

        Ok(ConsumerHandle { name })
    }

    /// Writes every element of `batch` into the ring in order, blocking as
    /// often as needed when the slowest consumer hasn't caught up. `batch`
    /// may exceed `capacity` — it is then written in multiple rounds.
    pub fn produce(&self, batch: &[T]) -> Result<()> {
        {
            let running = self.sync.with_lock(|state| state.running);
            if !running {
                return Err(DisruptorError::stopped(self.name.as_str()));
            }
        }

        let mut produced = 0usize;
        while produced < batch.len() {
            let mut guard = self.sync.lock();

            let free = guard.free_slots();
            if free <= 0 {
                let t0 = self.stats.now();
                self.sync.await_consumption(&mut guard, self.default_timeout);
                let elapsed = self.stats.now() - t0;
                self.stats.report_producer_blocked(Duration::from_secs_f64(elapsed.max(0.0)));
                continue;
            }

            let n = (free as usize).min(batch.len() - produced);
            let p = guard.producer_seq;
            guard.ring.mset(p, &batch[produced..produced + n]);
            guard.producer_seq += n as u64;
            produced += n;

            let lag = guard.lag();
            drop(guard);

            self.stats.sample_lag(lag);
            self.sync.notify_production();
        }

        self.stats.report_produced(batch.len() as u64);
        Ok(())
    }

    /// Stops the disruptor, waits for every consumer to drain and close,
    /// and records the final stats snapshot's end time. Idempotent: a
    /// second call returns immediately.
    pub fn close(&self) {
        let first_close = self.sync.with_lock(|state| {
            if state.running {
                state.running = false;
                true
            } else {
                false
            }
        });

        if !first_close {
            return;
        }

        tracing::info!(disruptor = %self.name, "closing disruptor");

        // Wake any consumer blocked on production and any producer blocked
        // on consumption so both sides re-check the running flag.
        self.sync.notify_production();
        self.sync.notify_consumption();

        for worker in self.workers.lock().iter_mut() {
            worker.join();
        }

        self.stats.close();
        tracing::info!(disruptor = %self.name, stats = ?self.stats.snapshot().produced_count, "disruptor closed");
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
