//! State manager messages
//!
//! Commands and responses for the actor pattern.

use taskstore::{NewTask, StoreError, Task, TaskId};
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

impl From<StoreError> for StateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidTask(msg) => StateError::InvalidTask(msg),
            other => StateError::StoreError(other.to_string()),
        }
    }
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    CreateTask {
        task: NewTask,
        reply: oneshot::Sender<StateResponse<Task>>,
    },
    GetTask {
        id: TaskId,
        reply: oneshot::Sender<StateResponse<Option<Task>>>,
    },
    ListTasks {
        reply: oneshot::Sender<StateResponse<Vec<Task>>>,
    },
    DeleteTask {
        id: TaskId,
        reply: oneshot::Sender<StateResponse<()>>,
    },

    Shutdown,
}
