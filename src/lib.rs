//! # Jules
//!
//! Jules is a small assistant agent backed by Google's hosted generative-language API. It
//! wraps one text-generation call behind four convenience operations and hands every outcome
//! back as a value, never as an error to handle.
//!
//! The crate is layered as follows:
//!
//! * **Configuration**: [`AgentConfig`] carries the API key, model and display name. It is
//!   built once (usually with [`AgentConfig::from_env`]) and never changes afterwards.
//! * **Transports**: the [`ClientWrapper`] trait performs exactly one generation request.
//!   [`clients::gemini::GeminiClient`] targets the native `generateContent` endpoint and
//!   [`clients::text::TextClient`] the legacy `generateText` one.
//! * **Agent**: [`Agent`] builds prompts, applies [`GenerationParameters`], and normalizes
//!   responses into [`AgentResult`].
//! * **Shell**: [`shell`] parses REPL commands and drives an agent line by line.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use jules::{Agent, AgentResult, TaskParameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     jules::init_logger();
//!
//!     let agent = Agent::from_env()?;
//!     if !agent.initialize().await {
//!         std::process::exit(1);
//!     }
//!
//!     let mut params = TaskParameters::new();
//!     params.insert("participants".into(), serde_json::json!(4));
//!
//!     match agent.run_task("Plan a simple amazing race game", &params).await {
//!         AgentResult::Success { text, .. } => println!("{}", text),
//!         AgentResult::Failure { error_message, .. } => eprintln!("{}", error_message),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Custom transports
//!
//! Anything implementing [`ClientWrapper`] can back an agent, which is how the tests run
//! without network access:
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use jules::client_wrapper::{
//!     Candidate, ClientWrapper, GenerationRequest, GenerationResponse, TransportError,
//! };
//! use jules::{Agent, AgentConfig};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ClientWrapper for Echo {
//!     fn model_name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn generate(
//!         &self,
//!         request: &GenerationRequest,
//!     ) -> Result<GenerationResponse, TransportError> {
//!         Ok(GenerationResponse {
//!             candidates: vec![Candidate { text: request.prompt.clone(), finish_reason: None }],
//!             usage: None,
//!         })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let agent = Agent::new(AgentConfig::new("unused").unwrap(), Arc::new(Echo));
//! assert_eq!(agent.chat("ping").await.text(), Some("ping"));
//! # }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Verbosity follows `RUST_LOG`; with it unset, `info` and above are shown.
///
/// ```rust
/// jules::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    });
}

pub mod jules;

pub use jules::agent::{Agent, AgentResult, ResponseMetadata};
pub use jules::client_wrapper;
pub use jules::client_wrapper::{ClientWrapper, FailureKind, TokenUsage};
pub use jules::clients;
pub use jules::config;
pub use jules::config::{AgentConfig, ConfigError};
pub use jules::generation::GenerationParameters;
pub use jules::prompt;
pub use jules::prompt::TaskParameters;
pub use jules::shell;
