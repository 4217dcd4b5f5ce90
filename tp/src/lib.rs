//! TaskPlanner - goal-to-task breakdown service
//!
//! Turns a free-text goal into 4-6 structured tasks by prompting a
//! text-generation model and parsing its reply against a fixed text grammar.
//!
//! # Core Concepts
//!
//! - **One call per goal**: no retries, no caching, no conversation state
//! - **Text grammar contract**: the prompt teaches the reply layout and the
//!   parser reads exactly that layout (see [`planning::grammar`])
//! - **All or nothing**: a request yields tasks or an error, never a partial list
//!
//! # Modules
//!
//! - [`llm`] - ModelClient trait and Gemini implementation
//! - [`prompts`] - Prompt template loading and rendering
//! - [`planning`] - Reply parser and the TaskGenerator pipeline
//! - [`domain`] - TaskRecord and Priority
//! - [`state`] - Actor owning the persistent task store
//! - [`server`] - HTTP API
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planning;
pub mod prompts;
pub mod server;
pub mod state;

pub use config::Config;
pub use domain::{Priority, TaskRecord};
pub use llm::{GeminiClient, LlmError, ModelClient, create_client};
pub use planning::{GenerateError, ResponseParser, TaskGenerator};
pub use prompts::{PromptBuilder, PromptLoader};
pub use state::StateManager;
