//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `{prompts.dir}/{name}.pmt` (user override)
//! 2. Embedded fallback compiled from `prompts/{name}.pmt`
//!
//! Templates substitute a single `{{goal}}` placeholder.

pub mod embedded;
mod loader;

pub use loader::{GOAL_PLACEHOLDER, PromptBuilder, PromptError, PromptLoader};
