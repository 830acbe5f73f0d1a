//! Task lifecycle tracking
//!
//! Producer and consumer each move through `NotStarted -> Running ->
//! Completed`, or end in `Failed` when they give up. The state lives in a
//! shared cell so the orchestrator can observe a task running on another
//! thread.

use crate::pipeline::error::{PipelineError, PipelineResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Which side of the channel a task sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskRole {
    Producer,
    Consumer,
}

impl TaskRole {
    /// Default thread name for the role
    pub fn thread_name(&self) -> &'static str {
        match self {
            TaskRole::Producer => "producer",
            TaskRole::Consumer => "consumer",
        }
    }
}

impl fmt::Display for TaskRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.thread_name())
    }
}

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    /// Created but `run` has not been called
    NotStarted,
    /// Moving items
    Running,
    /// Producer: sentinel enqueued. Consumer: sentinel dequeued.
    Completed,
    /// Gave up and reported an error
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::NotStarted, TaskState::Running)
                | (TaskState::Running, TaskState::Completed)
                | (TaskState::Running, TaskState::Failed)
        )
    }
}

/// Shared handle to a task's lifecycle state
#[derive(Debug, Clone)]
pub struct TaskStatus {
    role: TaskRole,
    state: Arc<Mutex<TaskState>>,
}

impl TaskStatus {
    pub fn new(role: TaskRole) -> Self {
        Self {
            role,
            state: Arc::new(Mutex::new(TaskState::NotStarted)),
        }
    }

    pub fn role(&self) -> TaskRole {
        self.role
    }

    /// Current state
    pub fn get(&self) -> TaskState {
        *self.state.lock()
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(&self, next: TaskState) -> PipelineResult<()> {
        let mut state = self.state.lock();
        if !state.can_transition_to(next) {
            return Err(PipelineError::InvalidTransition {
                role: self.role,
                from: *state,
                to: next,
            });
        }
        log::debug!("{} state {:?} -> {:?}", self.role, *state, next);
        *state = next;
        Ok(())
    }
}
