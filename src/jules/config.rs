//! Agent configuration.
//!
//! Provides the [`AgentConfig`] struct that carries the API key, the model identifier and
//! the display name of an [`Agent`](crate::Agent). The struct is built once at startup and
//! handed to the agent; nothing inside the library reads the environment on its own.
//!
//! # Example
//!
//! ```rust
//! use jules::AgentConfig;
//!
//! let config = AgentConfig::new("my-key").unwrap().with_agent_name("Navigator");
//! assert_eq!(config.model_name(), "gemini-pro");
//! assert_eq!(config.agent_name(), "Navigator");
//! ```

use std::error::Error;
use std::fmt;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Environment variable selecting the model.
pub const MODEL_NAME_VAR: &str = "MODEL_NAME";
/// Environment variable selecting the agent's display name.
pub const AGENT_NAME_VAR: &str = "AGENT_NAME";

pub const DEFAULT_MODEL_NAME: &str = "gemini-pro";
pub const DEFAULT_AGENT_NAME: &str = "Jules";

/// Steps printed by the binaries when the API key is missing.
pub const SETUP_INSTRUCTIONS: &str = "\
📝 Setup Instructions:
1. Copy .env.example to .env
2. Get your API key from https://makersuite.google.com/app/apikey
3. Add your API key to the .env file as GOOGLE_API_KEY
4. Run cargo run --bin jules-demo to test the agent";

/// Errors raised while building an [`AgentConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API key was unset or blank.
    MissingCredential,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential => write!(
                f,
                "{} is required. Please set it in your .env file.",
                API_KEY_VAR
            ),
        }
    }
}

impl Error for ConfigError {}

/// Immutable configuration shared by an agent and its transport.
///
/// The API key is never printed by the `Debug` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentConfig {
    api_key: String,
    model_name: String,
    agent_name: String,
}

impl AgentConfig {
    /// Create a config with the default model and agent name.
    ///
    /// Fails with [`ConfigError::MissingCredential`] when `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(Self {
            api_key,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
        })
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }

    /// Build a config from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present. Variables that
    /// are already set in the process win over the file.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => log::warn!("Ignoring unreadable .env file: {}", err),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Unset or blank optional values fall back to their defaults.
    ///
    /// ```rust
    /// use jules::AgentConfig;
    /// use std::collections::HashMap;
    ///
    /// let vars = HashMap::from([("GOOGLE_API_KEY", "k"), ("AGENT_NAME", "Scout")]);
    /// let config = AgentConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.agent_name(), "Scout");
    /// assert_eq!(config.model_name(), "gemini-pro");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR).ok_or(ConfigError::MissingCredential)?;
        let mut config = Self::new(api_key)?;
        if let Some(model_name) = non_blank(MODEL_NAME_VAR) {
            config.model_name = model_name;
        }
        if let Some(agent_name) = non_blank(AGENT_NAME_VAR) {
            config.agent_name = agent_name;
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("agent_name", &self.agent_name)
            .finish()
    }
}
