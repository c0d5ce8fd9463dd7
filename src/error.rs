//! Error types for the disruptor-lite broadcast ring buffer.

use thiserror::Error;

/// Result alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, DisruptorError>;

/// Library-level errors. Consumer-supplied failures are not part of this
/// enum — they travel as `anyhow::Error` through the consumer trait and the
/// error handler, since the library has no reason to match on their shape.
#[derive(Error, Debug)]
pub enum DisruptorError {
    /// `produce` was called after `close()`.
    #[error("disruptor '{name}' is stopped")]
    Stopped {
        /// Name of the disruptor instance, for multi-instance diagnostics.
        name: String,
    },

    /// A `DisruptorConfig` failed validation before construction.
    #[error("invalid disruptor config: {message}")]
    InvalidConfig {
        /// Human-readable description of what failed validation.
        message: String,
    },
}

impl DisruptorError {
    pub fn stopped(name: impl Into<String>) -> Self {
        DisruptorError::Stopped { name: name.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        DisruptorError::InvalidConfig { message: message.into() }
    }

    /// Whether a caller might reasonably retry after seeing this error.
    /// `Stopped` is terminal; a bad config is a programmer error, also
    /// terminal.
    pub fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_error_carries_name() {
        let err = DisruptorError::stopped("orders");
        assert_eq!(err.to_string(), "disruptor 'orders' is stopped");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn config_error_carries_message() {
        let err = DisruptorError::config("capacity must be non-zero");
        assert!(err.to_string().contains("capacity must be non-zero"));
    }
}
