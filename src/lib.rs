//! `ringcast` — a multi-producer / multi-consumer broadcast ring buffer.
//!
//! Every registered consumer independently observes every element
//! published by producers, in publication order; producers block when the
//! slowest consumer has fallen behind by a full buffer's worth of elements.
//! See [`disruptor::Disruptor`] for the entry point.

pub mod constants;
pub mod disruptor;
pub mod error;
pub mod utils;

pub use disruptor::{ConsumerCallback, ConsumerHandle, Disruptor, DisruptorConfig, RingBuffer, Stats, StatsSnapshot};
pub use error::{DisruptorError, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
