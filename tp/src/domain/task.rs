//! TaskRecord - one task extracted from a model reply

use serde::{Deserialize, Serialize};

use super::Priority;

/// A task extracted from the model's reply
///
/// Every field is the trimmed text found between two field markers. Nothing
/// is interpreted: `timeline`, `dependencies` and `due_date` stay opaque, and
/// `priority` is only uppercased (see [`TaskRecord::priority_level`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub heading: String,
    pub priority: String,
    pub timeline: String,
    pub dependencies: String,
    pub due_date: String,
    pub matter: String,
}

impl TaskRecord {
    /// The priority as a known level, if it is one
    pub fn priority_level(&self) -> Option<Priority> {
        self.priority.parse().ok()
    }

    /// True when the model reported no prerequisite tasks
    pub fn has_no_dependencies(&self) -> bool {
        self.dependencies.eq_ignore_ascii_case("none")
    }
}
