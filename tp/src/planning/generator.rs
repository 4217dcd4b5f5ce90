//! TaskGenerator - goal in, task records out
//!
//! Validates the goal, renders the prompt, makes exactly one model call and
//! parses the reply. Either a non-empty list of tasks comes back or an error
//! does; there is no partial success.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::grammar::GRAMMAR_VERSION;
use super::parser::ResponseParser;
use crate::domain::TaskRecord;
use crate::llm::{LlmError, ModelClient};
use crate::prompts::PromptBuilder;

/// Message returned for a missing or blank goal
pub const GOAL_REQUIRED: &str = "Goal is required";

/// Errors from task generation
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The goal was empty or whitespace; no call was made
    #[error("{0}")]
    Validation(String),

    /// The model call failed (transport, status or response shape)
    #[error("Error calling model API: {0}")]
    Upstream(#[from] LlmError),

    /// The reply contained no complete task block
    #[error("Model reply contained no parseable tasks")]
    EmptyResult,
}

impl GenerateError {
    /// True when the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerateError::Validation(_))
    }
}

/// Orchestrates prompt → model → parser
pub struct TaskGenerator {
    client: Arc<dyn ModelClient>,
    prompts: PromptBuilder,
    parser: ResponseParser,
}

impl TaskGenerator {
    /// Generator with the embedded prompt and default parser
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self::with_parts(client, PromptBuilder::new(), ResponseParser::new())
    }

    pub fn with_parts(client: Arc<dyn ModelClient>, prompts: PromptBuilder, parser: ResponseParser) -> Self {
        Self {
            client,
            prompts,
            parser,
        }
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Break a goal into tasks
    pub async fn generate_tasks(&self, goal: &str) -> Result<Vec<TaskRecord>, GenerateError> {
        let goal = goal.trim();
        debug!(goal_len = goal.len(), "generate_tasks: called");

        if goal.is_empty() {
            debug!("generate_tasks: blank goal rejected");
            return Err(GenerateError::Validation(GOAL_REQUIRED.to_string()));
        }

        let prompt = self.prompts.build_prompt(goal);
        let reply = self.client.generate(&prompt).await.inspect_err(|e| {
            warn!(error = %e, "generate_tasks: model call failed");
        })?;

        let mut tasks = self.parser.parse(&reply);
        tasks.truncate(self.parser.max_tasks());

        if tasks.is_empty() {
            warn!(reply_len = reply.len(), "generate_tasks: no tasks parsed from reply");
            return Err(GenerateError::EmptyResult);
        }

        for task in tasks.iter().filter(|t| t.priority_level().is_none()) {
            warn!(heading = %task.heading, priority = %task.priority, "generate_tasks: unrecognized priority");
        }

        info!(count = tasks.len(), grammar_version = GRAMMAR_VERSION, "Generated tasks for goal");
        Ok(tasks)
    }
}
