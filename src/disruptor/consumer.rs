//! The per-consumer worker thread and the trait external consumers implement.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::disruptor::synchronizer::Synchronizer;
use crate::disruptor::stats::Stats;

/// Capability set implemented by the caller's consumer object. Modeled as a
/// trait rather than a class hierarchy, per the re-architecture notes: a
/// consumer is just something that can `consume` a batch and `close`.
pub trait ConsumerCallback<T>: Send {
    /// Processes a non-empty ordered batch. May block. A returned `Err` is
    /// forwarded to the disruptor's error handler (if any) and logged; the
    /// cursor still advances past the batch — there is no redelivery.
    fn consume(&mut self, batch: &[T]) -> anyhow::Result<()>;

    /// Invoked exactly once, after the disruptor has stopped and this
    /// consumer has drained its final batch.
    fn close(&mut self);
}

/// Invoked when `consume` fails. Must not call back into the owning
/// Disruptor — it would deadlock against the Synchronizer's mutex.
pub type ErrorHandler<T> = Arc<dyn Fn(&str, &[T], &anyhow::Error) + Send + Sync>;

/// Handle to a spawned consumer worker thread.
pub struct ConsumerWorker {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl ConsumerWorker {
    /// Spawns the worker thread and returns its handle. `index` is this
    /// consumer's position in the Synchronizer's `consumers` vector,
    /// assigned once at registration and stable for the worker's lifetime.
    pub fn spawn<T>(
        name: String,
        index: usize,
        sync: Arc<Synchronizer<T>>,
        stats: Arc<Stats>,
        mut consumer: Box<dyn ConsumerCallback<T>>,
        error_handler: Option<ErrorHandler<T>>,
        timeout: Duration,
    ) -> Self
    where
        T: Clone + Send + 'static,
    {
        let thread_name = name.clone();
        let handle = std::thread::Builder::new()
            .name(format!("consumer-{}", name))
            .spawn(move || run(&thread_name, index, &sync, &stats, consumer.as_mut(), &error_handler, timeout))
            .expect("failed to spawn consumer worker thread");

        Self { name, handle: Some(handle) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until the worker has finished its drain pass and terminated.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(panic) = handle.join() {
                tracing::error!(consumer = %self.name, ?panic, "consumer worker thread panicked");
            }
        }
    }
}

fn deliver<T>(
    name: &str,
    batch: &[T],
    consumer: &mut dyn ConsumerCallback<T>,
    error_handler: &Option<ErrorHandler<T>>,
) {
    if let Err(err) = consumer.consume(batch) {
        tracing::warn!(consumer = name, batch_len = batch.len(), error = %err, "consumer failed; cursor still advances");
        if let Some(handler) = error_handler {
            handler(name, batch, &err);
        }
    }
}

/// The worker's main loop (§4.4): fetch under the lock, deliver outside it,
/// advance the cursor under the lock again — followed by a single drain
/// pass once the disruptor stops running.
fn run<T: Clone>(
    name: &str,
    index: usize,
    sync: &Synchronizer<T>,
    stats: &Stats,
    consumer: &mut dyn ConsumerCallback<T>,
    error_handler: &Option<ErrorHandler<T>>,
    timeout: Duration,
) {
    'main: loop {
        if let Some(guard) = sync.state_try_lock() {
            let lag = guard.lag();
            drop(guard);
            stats.sample_lag(lag);
        }

        let batch = {
            let mut guard = sync.lock();
            loop {
                if !guard.running {
                    break 'main;
                }
                let ci = guard.consumers[index].seq;
                let available = guard.producer_seq - ci;
                if available > 0 {
                    break guard.ring.mget(ci, available as usize);
                }
                let t0 = stats.now();
                sync.await_production(&mut guard, timeout);
                let elapsed = stats.now() - t0;
                stats.report_consumer_blocked(name, Duration::from_secs_f64(elapsed.max(0.0)));
            }
        };

        let t0 = stats.now();
        deliver(name, &batch, consumer, error_handler);
        let elapsed = stats.now() - t0;
        stats.report_consumed(name, batch.len() as u64, Duration::from_secs_f64(elapsed.max(0.0)));

        sync.with_lock(|state| state.consumers[index].seq += batch.len() as u64);
        sync.notify_consumption();
    }

    drain(name, index, sync, stats, consumer, error_handler);
}

fn drain<T: Clone>(
    name: &str,
    index: usize,
    sync: &Synchronizer<T>,
    stats: &Stats,
    consumer: &mut dyn ConsumerCallback<T>,
    error_handler: &Option<ErrorHandler<T>>,
) {
    let batch = sync.with_lock(|state| {
        state.consumers[index].draining = true;
        let ci = state.consumers[index].seq;
        let available = state.producer_seq - ci;
        if available > 0 {
            state.ring.mget(ci, available as usize)
        } else {
            Vec::new()
        }
    });

    if !batch.is_empty() {
        let t0 = stats.now();
        deliver(name, &batch, consumer, error_handler);
        let elapsed = stats.now() - t0;
        stats.report_consumed(name, batch.len() as u64, Duration::from_secs_f64(elapsed.max(0.0)));
        sync.with_lock(|state| state.consumers[index].seq += batch.len() as u64);
        sync.notify_consumption();
    }

    consumer.close();
}
