//! Single mutex plus two condition variables guarding the shared ring state.
//!
//! This generalizes the teacher's `BlockingWaitStrategy` (one mutex, one
//! condvar, used to park a single waiter kind) to the two named conditions
//! the broadcast ring needs: "a producer advanced `P`" and "some consumer
//! advanced its `Ci`".

use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::disruptor::ring_buffer::RingBuffer;
use crate::disruptor::Sequence;

/// State protected by the Synchronizer's single mutex: the ring itself, the
/// producer cursor, every registered consumer's cursor, and the running
/// flag. No other lock in the crate guards any of this.
pub struct RingState<T> {
    pub ring: RingBuffer<T>,
    pub producer_seq: Sequence,
    pub consumers: Vec<ConsumerCursor>,
    pub running: bool,
}

/// A registered consumer's cursor, tracked by the Synchronizer's shared
/// state so the producer side can compute `min(Ci)` without touching worker
/// internals.
pub struct ConsumerCursor {
    pub name: String,
    pub seq: Sequence,
    /// Set once this worker has begun its drain pass; `register_consumer`
    /// refuses new registrations once any worker has reached this state.
    pub draining: bool,
}

impl<T> RingState<T> {
    /// `free = capacity − P + min(Ci)`, falling back to `P` (all slots
    /// free) when no consumer is registered — the open question in the
    /// spec's design notes, resolved in favor of the empty-ring reading.
    pub fn free_slots(&self) -> i64 {
        let min_ci = self
            .consumers
            .iter()
            .map(|c| c.seq)
            .min()
            .unwrap_or(self.producer_seq);
        self.ring.capacity() as i64 - (self.producer_seq as i64 - min_ci as i64)
    }

    pub fn min_consumer_seq(&self) -> Sequence {
        self.consumers.iter().map(|c| c.seq).min().unwrap_or(self.producer_seq)
    }

    pub fn lag(&self) -> i64 {
        self.producer_seq as i64 - self.min_consumer_seq() as i64
    }
}

/// Mutex plus two condition variables on the same lock.
pub struct Synchronizer<T> {
    state: Mutex<RingState<T>>,
    produced_cv: Condvar,
    consumed_cv: Condvar,
}

impl<T> Synchronizer<T> {
    pub fn new(ring: RingBuffer<T>) -> Self {
        Self {
            state: Mutex::new(RingState { ring, producer_seq: 0, consumers: Vec::new(), running: true }),
            produced_cv: Condvar::new(),
            consumed_cv: Condvar::new(),
        }
    }

    /// Runs `f` while holding the mutex exclusively.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut RingState<T>) -> R) -> R {
        let mut guard = self.state.lock();
        f(&mut guard)
    }

    /// Acquires the lock, handing the caller the guard directly so it can
    /// interleave waits with predicate checks (the ConsumerWorker and
    /// Disruptor main loops both need this).
    pub fn lock(&self) -> MutexGuard<'_, RingState<T>> {
        self.state.lock()
    }

    /// Non-blocking lock attempt, used for the opportunistic lag sample
    /// (§4.6): skipped rather than blocked for when the lock is busy.
    pub fn state_try_lock(&self) -> Option<MutexGuard<'_, RingState<T>>> {
        self.state.try_lock()
    }

    /// Releases the mutex, blocks until `produced_cv` is signaled or
    /// `timeout` elapses, then reacquires. Returns whether a signal was
    /// received (as opposed to a timeout).
    pub fn await_production(&self, guard: &mut MutexGuard<'_, RingState<T>>, timeout: Duration) -> bool {
        let result = self.produced_cv.wait_for(guard, timeout);
        !result.timed_out()
    }

    /// Symmetric to [`await_production`](Self::await_production), on
    /// `consumed_cv`.
    pub fn await_consumption(&self, guard: &mut MutexGuard<'_, RingState<T>>, timeout: Duration) -> bool {
        let result = self.consumed_cv.wait_for(guard, timeout);
        !result.timed_out()
    }

    /// Wakes every waiter on `produced_cv`. Broadcast, not signal-one: we
    /// don't know a priori which consumer worker should proceed.
    pub fn notify_production(&self) {
        self.produced_cv.notify_all();
    }

    /// Wakes every waiter on `consumed_cv`.
    pub fn notify_consumption(&self) {
        self.consumed_cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_slots_falls_back_to_capacity_with_no_consumers() {
        let sync: Synchronizer<i32> = Synchronizer::new(RingBuffer::new(8));
        sync.with_lock(|state| {
            assert_eq!(state.free_slots(), 8);
        });
    }

    #[test]
    fn free_slots_shrinks_as_producer_advances() {
        let sync: Synchronizer<i32> = Synchronizer::new(RingBuffer::new(4));
        sync.with_lock(|state| {
            state.consumers.push(ConsumerCursor { name: "c1".into(), seq: 0, draining: false });
            state.producer_seq = 3;
            assert_eq!(state.free_slots(), 1);
        });
    }

    #[test]
    fn notify_wakes_a_blocked_waiter() {
        use std::sync::Arc;
        use std::thread;

        let sync: Arc<Synchronizer<i32>> = Arc::new(Synchronizer::new(RingBuffer::new(4)));
        let sync2 = sync.clone();
        let handle = thread::spawn(move || {
            let mut guard = sync2.lock();
            sync2.await_production(&mut guard, Duration::from_secs(5))
        });

        // Give the waiter a moment to actually start waiting.
        thread::sleep(Duration::from_millis(50));
        sync.with_lock(|state| state.producer_seq = 1);
        sync.notify_production();

        assert!(handle.join().unwrap());
    }
}
