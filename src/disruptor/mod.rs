//! The disruptor-lite broadcast ring buffer: a fixed-capacity ring with one
//! producer-side cursor and one independent read cursor per registered
//! consumer, synchronized by a single mutex and two condition variables.

pub mod config;
pub mod consumer;
pub mod disruptor;
pub mod ring_buffer;
pub mod stats;
pub mod synchronizer;

/// A monotonically non-decreasing count of elements ever published or
/// consumed. A slot's ring index is `seq mod capacity`.
pub type Sequence = u64;

pub use config::DisruptorConfig;
pub use consumer::{ConsumerCallback, ErrorHandler};
pub use disruptor::{ConsumerHandle, Disruptor};
pub use ring_buffer::RingBuffer;
pub use stats::{ConsumerStats, LagStats, Stats, StatsSnapshot};
pub use synchronizer::Synchronizer;
