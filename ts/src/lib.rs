//! TaskStore - SQLite-backed persistence for planned tasks
//!
//! A deliberately small keyed record store: create, list, get and delete.
//! The only invariant it maintains is identifier uniqueness; dependency
//! identifiers are stored as given and never resolved.
//!
//! # Example
//!
//! ```no_run
//! use taskstore::{NewTask, Store};
//!
//! let mut store = Store::open("tasks.db")?;
//! let task = store.create(NewTask::new("Define requirements", "Interview stakeholders"))?;
//! assert!(store.get(task.id)?.is_some());
//! # Ok::<(), taskstore::StoreError>(())
//! ```

mod error;
mod store;
mod task;

pub use error::StoreError;
pub use store::Store;
pub use task::{DEFAULT_STATUS, NewTask, Task, TaskId};

/// Current time as unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
