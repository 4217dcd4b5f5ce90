//! Core Store implementation

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::task::{DEFAULT_STATUS, NewTask, Task, TaskId};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT    NOT NULL,
    due_date    TEXT,
    status      TEXT    NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS task_dependencies (
    task_id    INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    position   INTEGER NOT NULL,
    depends_on INTEGER NOT NULL,
    PRIMARY KEY (task_id, position)
);
"#;

/// SQLite-backed task store
///
/// Not `Sync`; callers that share a store across tasks should own it from a
/// single actor.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Store::open: called");

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "Opened task store");
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("Store::open_in_memory: called");
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a new task and return it with its assigned id
    pub fn create(&mut self, new: NewTask) -> Result<Task, StoreError> {
        debug!(title = %new.title, deps = new.dependency_ids.len(), "Store::create: called");
        if new.title.trim().is_empty() {
            return Err(StoreError::InvalidTask("title is required".to_string()));
        }

        let status = new
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let created_at = crate::now_ms();
        let due_date = new.due_date.map(|d| d.format(DATE_FORMAT).to_string());

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (title, description, due_date, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.title, new.description, due_date, status, created_at],
        )?;
        let id = tx.last_insert_rowid();

        for (position, dep) in new.dependency_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO task_dependencies (task_id, position, depends_on) VALUES (?1, ?2, ?3)",
                params![id, position as i64, dep],
            )?;
        }
        tx.commit()?;

        debug!(%id, "Store::create: inserted");
        Ok(Task {
            id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            dependency_ids: new.dependency_ids,
            status,
            created_at,
        })
    }

    /// All tasks in ascending id order
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        debug!("Store::list: called");
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description, due_date, status, created_at FROM tasks ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], TaskRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let deps = self.dependencies_of(row.id)?;
            tasks.push(row.into_task(deps)?);
        }

        debug!(count = tasks.len(), "Store::list: loaded");
        Ok(tasks)
    }

    /// Fetch a task by id
    pub fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        debug!(%id, "Store::get: called");
        let row = self
            .conn
            .query_row(
                "SELECT id, title, description, due_date, status, created_at FROM tasks WHERE id = ?1",
                params![id],
                TaskRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => {
                let deps = self.dependencies_of(row.id)?;
                Ok(Some(row.into_task(deps)?))
            }
            None => {
                debug!(%id, "Store::get: not found");
                Ok(None)
            }
        }
    }

    /// Delete a task; returns whether a row was removed
    pub fn delete(&mut self, id: TaskId) -> Result<bool, StoreError> {
        debug!(%id, "Store::delete: called");
        let removed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Number of stored tasks
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    fn dependencies_of(&self, id: TaskId) -> Result<Vec<TaskId>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT depends_on FROM task_dependencies WHERE task_id = ?1 ORDER BY position ASC")?;
        let deps = stmt
            .query_map(params![id], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(deps)
    }
}

/// Raw `tasks` row before dependency ids are attached
struct TaskRow {
    id: TaskId,
    title: String,
    description: String,
    due_date: Option<String>,
    status: String,
    created_at: i64,
}

impl TaskRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            due_date: row.get(3)?,
            status: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_task(self, dependency_ids: Vec<TaskId>) -> Result<Task, StoreError> {
        let due_date = match self.due_date {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| StoreError::Corrupt {
                id: self.id,
                message: format!("bad due_date '{}': {}", raw, e),
            })?),
            None => None,
        };

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            due_date,
            dependency_ids,
            status: self.status,
            created_at: self.created_at,
        })
    }
}
