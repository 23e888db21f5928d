//! Prompt templates for the agent's convenience operations.
//!
//! Every builder is a pure function so the exact text sent to the model can be checked
//! without a network round-trip.

use std::collections::BTreeMap;

/// Free-form task parameters. The ordered map keeps rendered prompts deterministic.
pub type TaskParameters = BTreeMap<String, serde_json::Value>;

/// Prompt used by [`Agent::initialize`](crate::Agent::initialize) to check connectivity.
pub const CONNECTION_TEST_PROMPT: &str = "Hello! This is a connection test.";

pub const DEFAULT_BRAINSTORM_COUNT: usize = 5;

/// Render task parameters as two-space indented JSON with sorted keys.
pub fn render_parameters(parameters: &TaskParameters) -> String {
    // A map with string keys always serializes.
    serde_json::to_string_pretty(parameters).unwrap_or_else(|_| "{}".to_string())
}

pub fn task_prompt(task: &str, parameters: &TaskParameters) -> String {
    format!(
        "Task: {}\nParameters: {}\n\nPlease help me complete this task. Provide a clear, actionable response.",
        task,
        render_parameters(parameters)
    )
}

/// The question is passed through untouched when `context` is empty.
pub fn question_prompt(question: &str, context: &str) -> String {
    if context.is_empty() {
        return question.to_string();
    }
    format!(
        "Context: {}\n\nQuestion: {}\n\nPlease provide a helpful answer based on the context.",
        context, question
    )
}

pub fn brainstorm_prompt(topic: &str, count: usize) -> String {
    format!(
        "Please brainstorm {} creative ideas about: {}. Format your response as a numbered list.",
        count, topic
    )
}
