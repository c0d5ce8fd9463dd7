//! Builder for constructing a [`Disruptor`](crate::disruptor::disruptor::Disruptor),
//! mirroring the teacher's `RingBufferConfig` chainable-setter idiom.

use std::time::Duration;

use crate::constants::{DEFAULT_AWAIT_TIMEOUT, DEFAULT_DISRUPTOR_NAME};
use crate::disruptor::consumer::ErrorHandler;
use crate::error::{DisruptorError, Result};
use crate::utils::time::{default_time_fn, TimeFn};

/// Construction parameters for a `Disruptor<T>`.
pub struct DisruptorConfig<T> {
    capacity: usize,
    name: String,
    error_handler: Option<ErrorHandler<T>>,
    time_fn: Option<TimeFn>,
    default_timeout: Duration,
}

impl<T> DisruptorConfig<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            name: DEFAULT_DISRUPTOR_NAME.to_string(),
            error_handler: None,
            time_fn: None,
            default_timeout: DEFAULT_AWAIT_TIMEOUT,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_error_handler(mut self, handler: ErrorHandler<T>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn with_time_fn(mut self, time_fn: TimeFn) -> Self {
        self.time_fn = Some(time_fn);
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(DisruptorError::config("capacity must be non-zero"));
        }
        Ok(())
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn error_handler(&self) -> Option<ErrorHandler<T>> {
        self.error_handler.clone()
    }

    pub(crate) fn time_fn(&self) -> TimeFn {
        self.time_fn.clone().unwrap_or_else(default_time_fn)
    }

    pub(crate) fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_fails_validation() {
        let cfg: DisruptorConfig<i32> = DisruptorConfig::new(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn builder_defaults_are_sane() {
        let cfg: DisruptorConfig<i32> = DisruptorConfig::new(16);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.name(), DEFAULT_DISRUPTOR_NAME);
        assert_eq!(cfg.default_timeout(), DEFAULT_AWAIT_TIMEOUT);
    }

    #[test]
    fn with_name_overrides_default() {
        let cfg: DisruptorConfig<i32> = DisruptorConfig::new(16).with_name("orders");
        assert_eq!(cfg.name(), "orders");
    }
}
