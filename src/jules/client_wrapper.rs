//! A ClientWrapper is a thin transport around one text-generation endpoint.
//! It turns a [`GenerationRequest`] into a single remote call and hands back the raw
//! candidates. It keeps no conversation state; prompt shaping and result normalization
//! live in [`Agent`](crate::Agent).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tokio::sync::Mutex;

use crate::jules::generation::GenerationParameters;

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// One prompt plus the sampling parameters to apply to it.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub parameters: GenerationParameters,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, parameters: GenerationParameters) -> Self {
        Self {
            prompt: prompt.into(),
            parameters,
        }
    }
}

/// One generated option returned by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub text: String,
    /// Why generation stopped, e.g. `STOP` or `MAX_TOKENS`. Not every endpoint reports it.
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationResponse {
    pub candidates: Vec<Candidate>,
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

/// Classification of a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be reached (DNS, connect, timeout).
    Connectivity,
    /// The API key was rejected.
    InvalidCredential,
    /// The key is valid but not allowed to use the model.
    PermissionDenied,
    /// Quota or rate limit exhausted.
    QuotaExceeded,
    /// The service answered without any candidate.
    EmptyResponse,
    /// The request was rejected locally before being sent.
    InvalidInput,
    /// Any other failure.
    Request,
}

impl FailureKind {
    /// Classify a plain error message by the status tokens the service embeds in it.
    ///
    /// ```rust
    /// use jules::client_wrapper::FailureKind;
    ///
    /// assert_eq!(FailureKind::classify("[400] API_KEY_INVALID"), FailureKind::InvalidCredential);
    /// assert_eq!(FailureKind::classify("socket hang up"), FailureKind::Request);
    /// ```
    pub fn classify(message: &str) -> FailureKind {
        if message.contains("API_KEY_INVALID") || message.contains("API key not valid") {
            FailureKind::InvalidCredential
        } else if message.contains("PERMISSION_DENIED") {
            FailureKind::PermissionDenied
        } else if message.contains("QUOTA_EXCEEDED") || message.contains("RESOURCE_EXHAUSTED") {
            FailureKind::QuotaExceeded
        } else {
            FailureKind::Request
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Connectivity => "connectivity failure",
            FailureKind::InvalidCredential => "invalid credential",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::QuotaExceeded => "quota exceeded",
            FailureKind::EmptyResponse => "empty response",
            FailureKind::InvalidInput => "invalid input",
            FailureKind::Request => "request failure",
        };
        f.write_str(label)
    }
}

/// Error returned by a [`ClientWrapper`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build an error whose kind is inferred from the message text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FailureKind::classify(&message),
            message,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() {
            FailureKind::Connectivity
        } else {
            FailureKind::Request
        };
        // URLs may carry the API key as a query parameter.
        TransportError::new(kind, err.without_url().to_string())
    }
}

/// Trait defining the interface to a text-generation service.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Model identifier the transport sends requests to.
    fn model_name(&self) -> &str;

    /// Issue exactly one generation request.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, TransportError>;

    /// Usage from the *last* successful `generate()` call.
    /// Default impl reads [`usage_slot`](Self::usage_slot).
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        match self.usage_slot() {
            Some(slot) => *slot.lock().await,
            None => None,
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        // Transports that track usage override this.
        None
    }
}
