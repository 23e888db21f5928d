//! Client for the legacy REST `generateText` endpoint (`v1beta2`).
//!
//! The endpoint takes a bare prompt instead of a content list and returns candidates with an
//! `output` field and no finish reason. The API key travels percent-encoded as the `key` query
//! parameter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::jules::client_wrapper::{
    Candidate, ClientWrapper, GenerationRequest, GenerationResponse, TransportError,
};
use crate::jules::clients::common::{normalize_base_url, post_json, DEFAULT_BASE_URL};
use crate::jules::clients::http_pool::get_http_client;

pub struct TextClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTextRequest<'a> {
    prompt: TextPrompt<'a>,
    temperature: f32,
    candidate_count: u32,
    max_output_tokens: u32,
    top_k: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateTextResponse {
    #[serde(default)]
    candidates: Vec<TextCandidate>,
}

#[derive(Debug, Deserialize)]
struct TextCandidate {
    #[serde(default)]
    output: String,
}

impl TextClient {
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        let base_url = normalize_base_url(base_url);
        TextClient {
            http: get_http_client(&base_url),
            api_key: secret_key.to_string(),
            base_url,
            model: model_name.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta2/models/{}:generateText?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl ClientWrapper for TextClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, TransportError> {
        let params = &request.parameters;
        let payload = GenerateTextRequest {
            prompt: TextPrompt {
                text: &request.prompt,
            },
            temperature: params.temperature,
            candidate_count: 1,
            max_output_tokens: params.max_output_tokens,
            top_k: params.top_k,
            top_p: params.top_p,
        };

        let raw: GenerateTextResponse =
            post_json(&self.http, &self.endpoint(), None, &payload).await?;

        Ok(GenerationResponse {
            candidates: raw
                .candidates
                .into_iter()
                .map(|candidate| Candidate {
                    text: candidate.output,
                    finish_reason: None,
                })
                .collect(),
            usage: None,
        })
    }
}
