//! Google Gemini client speaking the native `generateContent` endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use jules::client_wrapper::{ClientWrapper, GenerationRequest};
//! use jules::clients::gemini::{GeminiClient, Model};
//! use jules::GenerationParameters;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = std::env::var("GOOGLE_API_KEY")?;
//!     let client = GeminiClient::new_with_model_enum(&key, Model::Gemini15Flash);
//!     let response = client
//!         .generate(&GenerationRequest::new("Name three relay-race stations.", GenerationParameters::default()))
//!         .await?;
//!     if let Some(candidate) = response.first_candidate() {
//!         println!("{}", candidate.text);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::jules::client_wrapper::{
    Candidate, ClientWrapper, GenerationRequest, GenerationResponse, TokenUsage, TransportError,
};
use crate::jules::clients::common::{normalize_base_url, post_json, DEFAULT_BASE_URL};
use crate::jules::clients::http_pool::get_http_client;
use crate::jules::generation::GenerationParameters;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    pub model: String,
    token_usage: Mutex<Option<TokenUsage>>,
}

/// Commonly used Gemini text models.
pub enum Model {
    GeminiPro,
    Gemini10Pro,
    Gemini15Pro,
    Gemini15Flash,
    Gemini15Flash8b,
    Gemini20Flash,
    Gemini20FlashLite,
    Gemini25Flash,
    Gemini25Pro,
}

pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GeminiPro => "gemini-pro".to_string(),
        Model::Gemini10Pro => "gemini-1.0-pro".to_string(),
        Model::Gemini15Pro => "gemini-1.5-pro".to_string(),
        Model::Gemini15Flash => "gemini-1.5-flash".to_string(),
        Model::Gemini15Flash8b => "gemini-1.5-flash-8b".to_string(),
        Model::Gemini20Flash => "gemini-2.0-flash".to_string(),
        Model::Gemini20FlashLite => "gemini-2.0-flash-lite".to_string(),
        Model::Gemini25Flash => "gemini-2.5-flash".to_string(),
        Model::Gemini25Pro => "gemini-2.5-pro".to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

fn into_generation_response(response: GenerateContentResponse) -> GenerationResponse {
    let candidates = response
        .candidates
        .into_iter()
        .map(|candidate| Candidate {
            text: candidate
                .content
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<String>()
                })
                .unwrap_or_default(),
            finish_reason: candidate.finish_reason,
        })
        .collect();

    let usage = response.usage_metadata.map(|usage| TokenUsage {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
        total_tokens: usage.total_token_count,
    });

    GenerationResponse { candidates, usage }
}

impl GeminiClient {
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, DEFAULT_BASE_URL)
    }

    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Create a client pointing at a custom host.
    /// The default is "<https://generativelanguage.googleapis.com>".
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        let base_url = normalize_base_url(base_url);
        GeminiClient {
            http: get_http_client(&base_url),
            api_key: secret_key.to_string(),
            base_url,
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl ClientWrapper for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, TransportError> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: request.parameters,
        };

        let raw: GenerateContentResponse =
            post_json(&self.http, &self.endpoint(), Some(&self.api_key), &payload).await?;
        let response = into_generation_response(raw);

        if let Some(usage) = response.usage {
            *self.token_usage.lock().await = Some(usage);
        }
        Ok(response)
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: "hi" }],
            }],
            generation_config: GenerationParameters::default().with_top_k(8),
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["contents"][0]["role"], json!("user"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("hi"));
        assert_eq!(body["generationConfig"]["topK"], json!(8));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(1000));
    }

    #[test]
    fn test_response_conversion_joins_parts() {
        let raw: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Ready, "}, {"text": "set, go!"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 4, "totalTokenCount": 9}
        }))
        .unwrap();
        let response = into_generation_response(raw);
        let first = response.first_candidate().unwrap();
        assert_eq!(first.text, "Ready, set, go!");
        assert_eq!(first.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.unwrap().total_tokens, 9);
    }

    #[test]
    fn test_endpoint_and_model() {
        let client =
            GeminiClient::new_with_base_url("k", "gemini-1.5-flash", "http://localhost:1234/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
        let client = GeminiClient::new_with_model_enum("k", Model::GeminiPro);
        assert_eq!(client.model_name(), "gemini-pro");
    }
}
