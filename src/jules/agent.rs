//! Agent
//!
//! This module provides the [`Agent`] struct, a named assistant that turns high-level intents
//! (chat, task, question, brainstorm) into a single generation request and normalizes whatever
//! comes back into an [`AgentResult`].
//!
//! Every public operation funnels through [`Agent::chat_with`], the one place where requests
//! are built, parameters validated and failures captured. Callers never deal with `Err`:
//! they match on [`AgentResult::Success`] / [`AgentResult::Failure`].
//!
//! # Example
//!
//! ```rust,no_run
//! use jules::{Agent, AgentConfig, AgentResult};
//!
//! # async {
//! let agent = Agent::from_config(AgentConfig::new("key").unwrap());
//! match agent.brainstorm("office scavenger hunt clues", 3).await {
//!     AgentResult::Success { text, .. } => println!("{}", text),
//!     AgentResult::Failure { error_message, .. } => eprintln!("{}", error_message),
//! }
//! # };
//! ```

use std::sync::Arc;

use log::{debug, error, info};

use crate::jules::client_wrapper::{
    ClientWrapper, FailureKind, GenerationRequest, TokenUsage, TransportError,
};
use crate::jules::clients::gemini::GeminiClient;
use crate::jules::config::{AgentConfig, ConfigError};
use crate::jules::generation::GenerationParameters;
use crate::jules::prompt::{self, TaskParameters};

/// Details about a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetadata {
    /// Number of candidates the service returned. Only the first is used.
    pub candidate_count: usize,
    /// Finish reason of the first candidate, when the endpoint reports one.
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Outcome of one agent operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentResult {
    Success {
        text: String,
        agent_name: String,
        metadata: ResponseMetadata,
    },
    Failure {
        error_message: String,
        agent_name: String,
        kind: FailureKind,
    },
}

impl AgentResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AgentResult::Success { .. })
    }

    pub fn agent_name(&self) -> &str {
        match self {
            AgentResult::Success { agent_name, .. } | AgentResult::Failure { agent_name, .. } => {
                agent_name
            }
        }
    }

    /// Generated text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            AgentResult::Success { text, .. } => Some(text),
            AgentResult::Failure { .. } => None,
        }
    }

    /// Error message, if the call failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AgentResult::Success { .. } => None,
            AgentResult::Failure { error_message, .. } => Some(error_message),
        }
    }
}

/// A named assistant bound to one generation transport.
///
/// The agent holds only immutable configuration and is safe to share across tasks.
pub struct Agent {
    config: AgentConfig,
    client: Arc<dyn ClientWrapper>,
}

impl Agent {
    /// Create an agent on top of any transport.
    pub fn new(config: AgentConfig, client: Arc<dyn ClientWrapper>) -> Self {
        Self { config, client }
    }

    /// Create an agent bound to the native Gemini endpoint for `config.model_name()`.
    pub fn from_config(config: AgentConfig) -> Self {
        let client = GeminiClient::new_with_model_string(config.api_key(), config.model_name());
        Self::new(config, Arc::new(client))
    }

    /// Read configuration from the environment (and `.env`) and bind Gemini.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when `GOOGLE_API_KEY` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        AgentConfig::from_env().map(Self::from_config)
    }

    pub fn name(&self) -> &str {
        self.config.agent_name()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Check connectivity with one small generation call.
    ///
    /// Returns `false` and logs a diagnostic on any failure, including a reply without
    /// candidates.
    pub async fn initialize(&self) -> bool {
        info!("Initializing {} agent...", self.name());
        match self.test_connection().await {
            Ok(()) => {
                info!("{} agent initialized successfully!", self.name());
                true
            }
            Err(err) => {
                error!("Failed to initialize {} agent: {}", self.name(), err);
                if let Some(hint) = diagnostic_hint(err.kind) {
                    error!("{}", hint);
                }
                false
            }
        }
    }

    async fn test_connection(&self) -> Result<(), TransportError> {
        let request = GenerationRequest::new(
            prompt::CONNECTION_TEST_PROMPT,
            GenerationParameters::default(),
        );
        let response = self.client.generate(&request).await.map_err(|err| {
            TransportError::new(err.kind, format!("Connection test failed: {}", err))
        })?;
        if response.candidates.is_empty() {
            return Err(TransportError::new(
                FailureKind::EmptyResponse,
                "Connection test failed: No response generated",
            ));
        }
        Ok(())
    }

    /// Send `message` as-is with default generation parameters.
    pub async fn chat(&self, message: &str) -> AgentResult {
        self.chat_with(message, &GenerationParameters::default()).await
    }

    /// Send `message` as-is with explicit generation parameters.
    pub async fn chat_with(&self, message: &str, parameters: &GenerationParameters) -> AgentResult {
        if let Err(err) = parameters.validate() {
            return self.failure(FailureKind::InvalidInput, err.to_string());
        }

        debug!(
            "{} -> {} [{}]: {}",
            self.name(),
            self.client.model_name(),
            parameter_summary(parameters),
            preview(message)
        );

        let request = GenerationRequest::new(message, *parameters);
        let response = match self.client.generate(&request).await {
            Ok(response) => response,
            Err(err) => {
                debug!("{} request failed ({}): {}", self.name(), err.kind, err);
                return self.failure(err.kind, err.message);
            }
        };

        let first = match response.first_candidate() {
            Some(candidate) => candidate,
            None => return self.failure(FailureKind::EmptyResponse, "No response generated"),
        };
        if first.text.is_empty() {
            let reason = first.finish_reason.as_deref().unwrap_or("unknown");
            return self.failure(
                FailureKind::EmptyResponse,
                format!("No response generated (finish reason: {})", reason),
            );
        }

        AgentResult::Success {
            text: first.text.clone(),
            agent_name: self.name().to_string(),
            metadata: ResponseMetadata {
                candidate_count: response.candidates.len(),
                finish_reason: first.finish_reason.clone(),
                usage: response.usage,
            },
        }
    }

    /// Ask the model to carry out `task`, embedding `parameters` as JSON in the prompt.
    ///
    /// `temperature`, `maxOutputTokens`, `topK` and `topP` entries also override the
    /// generation defaults for this call.
    pub async fn run_task(&self, task: &str, parameters: &TaskParameters) -> AgentResult {
        info!("{} is running task: {}", self.name(), task);
        let task_prompt = prompt::task_prompt(task, parameters);
        let generation = GenerationParameters::default().overridden_by(parameters);
        self.chat_with(&task_prompt, &generation).await
    }

    /// Ask a question, optionally grounded in `context`. An empty context sends the question
    /// unchanged.
    pub async fn ask_question(&self, question: &str, context: &str) -> AgentResult {
        self.chat(&prompt::question_prompt(question, context)).await
    }

    /// Request `count` numbered ideas about `topic`.
    pub async fn brainstorm(&self, topic: &str, count: usize) -> AgentResult {
        self.chat(&prompt::brainstorm_prompt(topic, count)).await
    }

    fn failure(&self, kind: FailureKind, message: impl Into<String>) -> AgentResult {
        let mut error_message = message.into();
        if error_message.is_empty() {
            error_message = format!("Request failed ({})", kind);
        }
        AgentResult::Failure {
            error_message,
            agent_name: self.name().to_string(),
            kind,
        }
    }
}

fn diagnostic_hint(kind: FailureKind) -> Option<&'static str> {
    match kind {
        FailureKind::InvalidCredential => {
            Some("Invalid API key. Please check your GOOGLE_API_KEY in .env file.")
        }
        FailureKind::PermissionDenied => {
            Some("Permission denied. Make sure your API key has the correct permissions.")
        }
        FailureKind::QuotaExceeded => {
            Some("API quota exceeded. Please check your Google AI Studio usage.")
        }
        _ => None,
    }
}

fn parameter_summary(parameters: &GenerationParameters) -> String {
    format!(
        "temperature={} topK={} topP={} maxOutputTokens={}",
        parameters.temperature, parameters.top_k, parameters.top_p, parameters.max_output_tokens
    )
}

fn preview(message: &str) -> &str {
    let end = message
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(message.len());
    &message[..end]
}
