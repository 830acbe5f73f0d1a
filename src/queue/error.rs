//! Queue Error Types
//!
//! Defines the outcomes of channel construction and of blocking operations
//! that did not complete.

use std::fmt;
use thiserror::Error;

/// Result type for queue construction and configuration
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors raised while building a channel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Capacity must be at least one slot
    #[error("Invalid channel capacity {capacity}: capacity must be at least 1")]
    InvalidCapacity { capacity: usize },
}

/// A `put` that did not enqueue its item.
///
/// The rejected item is handed back so the caller can retry or discard it.
#[derive(Error, Clone, PartialEq, Eq)]
pub enum PutError<T> {
    /// The channel stayed full for the whole wait
    #[error("Timed out waiting for space in the channel")]
    Timeout(T),

    /// The channel was closed before space became available
    #[error("Channel is closed - cannot add more items")]
    Closed(T),
}

impl<T> PutError<T> {
    /// Recover the item that was not enqueued
    pub fn into_inner(self) -> T {
        match self {
            PutError::Timeout(item) | PutError::Closed(item) => item,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PutError::Timeout(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PutError::Closed(_))
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::Timeout(_) => f.write_str("Timeout(..)"),
            PutError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// A `get` that did not return an item
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GetError {
    /// The channel stayed empty for the whole wait
    #[error("Timed out waiting for an item from the channel")]
    Timeout,

    /// The channel was closed and every buffered item has been taken
    #[error("Channel is closed and drained")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_creation() {
        let error = QueueError::InvalidCapacity { capacity: 0 };
        assert_eq!(
            error.to_string(),
            "Invalid channel capacity 0: capacity must be at least 1"
        );
    }

    #[test]
    fn test_put_error_returns_item() {
        let error = PutError::Timeout(String::from("payload"));
        assert!(error.is_timeout());
        assert!(!error.is_closed());
        assert_eq!(error.into_inner(), "payload");

        let error = PutError::Closed(7);
        assert!(error.is_closed());
        assert_eq!(error.into_inner(), 7);
    }

    #[test]
    fn test_put_error_debug_hides_payload() {
        struct Opaque;
        assert_eq!(format!("{:?}", PutError::Timeout(Opaque)), "Timeout(..)");
        assert_eq!(format!("{:?}", PutError::Closed(Opaque)), "Closed(..)");
    }

    #[test]
    fn test_get_error_messages() {
        assert_eq!(
            GetError::Timeout.to_string(),
            "Timed out waiting for an item from the channel"
        );
        assert_eq!(GetError::Closed.to_string(), "Channel is closed and drained");
    }
}
