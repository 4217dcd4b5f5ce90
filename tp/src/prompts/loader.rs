//! Prompt Loader
//!
//! Loads the task breakdown template from disk or falls back to the embedded
//! default, and renders it for a goal.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::embedded;
use crate::planning::grammar;

/// Placeholder replaced by the goal text
pub const GOAL_PLACEHOLDER: &str = "{{goal}}";

/// Errors from loading a prompt template
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read prompt template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt template '{0}' has no {{{{goal}}}} placeholder")]
    MissingPlaceholder(String),

    #[error("Prompt template '{0}' does not show every field marker in order")]
    MissingMarkers(String),
}

/// Renders the task breakdown prompt for a goal
///
/// Holds a template already checked against the reply grammar, so rendering
/// cannot fail.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            template: embedded::TASK_BREAKDOWN.to_string(),
        }
    }
}

impl PromptBuilder {
    /// Builder over the embedded template
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder over a custom template
    ///
    /// The template must contain the goal placeholder and demonstrate all six
    /// field markers in order.
    pub fn from_template(name: &str, template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        debug!(%name, template_len = template.len(), "from_template: called");

        if !template.contains(GOAL_PLACEHOLDER) {
            return Err(PromptError::MissingPlaceholder(name.to_string()));
        }
        if !grammar::contains_markers_in_order(&template) {
            return Err(PromptError::MissingMarkers(name.to_string()));
        }

        Ok(Self { template })
    }

    /// Render the prompt for a goal
    pub fn build_prompt(&self, goal: &str) -> String {
        debug!(goal_len = goal.len(), "build_prompt: called");
        self.template.replace(GOAL_PLACEHOLDER, goal)
    }

    /// The raw template text
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Resolves prompt templates from an override directory
#[derive(Debug, Clone)]
pub struct PromptLoader {
    dir: PathBuf,
}

impl PromptLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an override for `name` would live at
    pub fn override_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.pmt", name))
    }

    /// Load the task breakdown builder, preferring an on-disk override
    pub fn load_builder(&self) -> Result<PromptBuilder, PromptError> {
        let name = embedded::TASK_BREAKDOWN_NAME;
        let path = self.override_path(name);

        if path.exists() {
            let template = read_template(&path)?;
            let builder = PromptBuilder::from_template(name, template)?;
            info!(path = %path.display(), "Loaded prompt template override");
            return Ok(builder);
        }

        debug!(path = %path.display(), "load_builder: no override, using embedded template");
        Ok(PromptBuilder::new())
    }
}

fn read_template(path: &Path) -> Result<String, PromptError> {
    std::fs::read_to_string(path).map_err(|source| PromptError::Io {
        path: path.to_path_buf(),
        source,
    })
}
