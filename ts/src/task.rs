//! Persisted task records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on insert
pub type TaskId = i64;

/// Status given to tasks created without one
pub const DEFAULT_STATUS: &str = "pending";

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub dependency_ids: Vec<TaskId>,
    pub status: String,
    /// Creation time (unix ms)
    pub created_at: i64,
}

/// Input for creating a task; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub dependency_ids: Vec<TaskId>,
    pub status: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_dependencies(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependency_ids = ids.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
