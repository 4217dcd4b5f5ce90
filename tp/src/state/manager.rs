//! StateManager - actor that owns TaskStore
//!
//! Processes commands via channels for thread-safe access to persistent state.

use std::path::Path;

use taskstore::{NewTask, Store, Task, TaskId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::messages::{StateCommand, StateError, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor over the store at `db_path`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(db_path: impl AsRef<Path>) -> StateResponse<Self> {
        debug!(db_path = %db_path.as_ref().display(), "spawn: called");
        let store = Store::open(db_path.as_ref())?;
        let count = store.count()?;
        info!(count, "StateManager store ready");
        Ok(Self::start(store))
    }

    /// Spawn over a fresh in-memory store
    pub fn spawn_in_memory() -> StateResponse<Self> {
        debug!("spawn_in_memory: called");
        Ok(Self::start(Store::open_in_memory()?))
    }

    fn start(store: Store) -> Self {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(store, rx));
        info!("StateManager spawned");
        Self { tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Create a task, returning it with its assigned id
    pub async fn create_task(&self, task: NewTask) -> StateResponse<Task> {
        debug!(title = %task.title, "create_task: called");
        self.request(|reply| StateCommand::CreateTask { task, reply }).await
    }

    /// Get a task by id
    pub async fn get_task(&self, id: TaskId) -> StateResponse<Option<Task>> {
        debug!(%id, "get_task: called");
        self.request(|reply| StateCommand::GetTask { id, reply }).await
    }

    /// All tasks in ascending id order
    pub async fn list_tasks(&self) -> StateResponse<Vec<Task>> {
        debug!("list_tasks: called");
        self.request(|reply| StateCommand::ListTasks { reply }).await
    }

    /// Delete a task; `NotFound` when no task has this id
    pub async fn delete_task(&self, id: TaskId) -> StateResponse<()> {
        debug!(%id, "delete_task: called");
        self.request(|reply| StateCommand::DeleteTask { id, reply }).await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

/// The actor loop that processes commands
async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("actor_loop: called");
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::CreateTask { task, reply } => {
                debug!(title = %task.title, "actor_loop: CreateTask command");
                let result = store.create(task).map_err(StateError::from);
                if let Ok(created) = &result {
                    info!(id = created.id, "Created task");
                }
                let _ = reply.send(result);
            }

            StateCommand::GetTask { id, reply } => {
                debug!(%id, "actor_loop: GetTask command");
                let _ = reply.send(store.get(id).map_err(StateError::from));
            }

            StateCommand::ListTasks { reply } => {
                debug!("actor_loop: ListTasks command");
                let _ = reply.send(store.list().map_err(StateError::from));
            }

            StateCommand::DeleteTask { id, reply } => {
                debug!(%id, "actor_loop: DeleteTask command");
                let result = match store.delete(id) {
                    Ok(true) => {
                        info!(%id, "Deleted task");
                        Ok(())
                    }
                    Ok(false) => Err(StateError::NotFound(id)),
                    Err(e) => Err(StateError::from(e)),
                };
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
