//! Planning module - goal decomposition through the model
//!
//! ```text
//! goal → PromptBuilder → prompt → ModelClient → reply → ResponseParser → TaskRecords
//! ```
//!
//! [`TaskGenerator`] runs the pipeline. The prompt and the parser agree on
//! the reply layout through [`grammar`].

mod generator;
pub mod grammar;
mod parser;

pub use generator::{GOAL_REQUIRED, GenerateError, TaskGenerator};
pub use parser::{MAX_TASKS, ResponseParser};
