//! Pipeline Error Types

use crate::pipeline::state::{TaskRole, TaskState};
use crate::queue::QueueError;
use thiserror::Error;
use uuid::Uuid;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that end a transfer
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Channel could not be built
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Configuration values are unusable
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfiguration(String),

    /// Every bounded put attempt for one item timed out
    #[error("Producer gave up after {attempts} timed-out puts ({produced} items produced)")]
    ProducerTimedOut { produced: usize, attempts: u32 },

    /// Every bounded get attempt timed out while waiting for the next item
    #[error("Consumer gave up after {attempts} timed-out gets ({consumed} items consumed)")]
    ConsumerTimedOut { consumed: usize, attempts: u32 },

    /// The channel was closed underneath a task, usually because its
    /// counterpart failed
    #[error("Channel closed before the {role} finished")]
    ChannelClosed { role: TaskRole },

    /// The consumer saw an end marker belonging to another session
    #[error("Sentinel for session {found} received by consumer of session {expected}")]
    SentinelMismatch { expected: Uuid, found: Uuid },

    /// A task lifecycle step out of order
    #[error("Invalid {role} state transition from {from:?} to {to:?}")]
    InvalidTransition {
        role: TaskRole,
        from: TaskState,
        to: TaskState,
    },

    /// A task body panicked
    #[error("The {role} task panicked: {message}")]
    TaskPanicked { role: TaskRole, message: String },

    /// The OS refused to start a task thread
    #[error("Failed to spawn the {role} thread")]
    Spawn {
        role: TaskRole,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Timeouts may succeed on a later attempt; everything else is final
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PipelineError::ProducerTimedOut { .. } | PipelineError::ConsumerTimedOut { .. }
        )
    }
}
