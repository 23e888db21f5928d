//! Helpers shared by the HTTP transports: base-URL handling, the JSON POST round trip and
//! the mapping of Google error responses to [`TransportError`].

use log::error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::jules::client_wrapper::{FailureKind, TransportError};

/// Default host of the Google generative-language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Strip trailing slashes so path joins never produce `//`.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Google API error envelope: `{"error": {"code", "message", "status", "details"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Map an HTTP error status and body to a [`TransportError`].
///
/// The message keeps the HTTP code and the status/reason tokens so that
/// [`FailureKind::classify`] yields the same kind from the text alone.
pub fn error_from_response(http_status: u16, body: &str) -> TransportError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let reason = parsed.details.iter().find_map(|d| d.reason.clone());
    let status = parsed.status.unwrap_or_default();
    let detail = if !parsed.message.is_empty() {
        parsed.message
    } else if !body.trim().is_empty() {
        body.trim().to_string()
    } else {
        reqwest::StatusCode::from_u16(http_status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Request failed")
            .to_string()
    };

    let mut tag = http_status.to_string();
    for token in [status.as_str(), reason.as_deref().unwrap_or("")] {
        if !token.is_empty() {
            tag.push(' ');
            tag.push_str(token);
        }
    }
    let message = format!("[{}] {}", tag, detail);

    let kind = match FailureKind::classify(&message) {
        FailureKind::Request => match http_status {
            401 => FailureKind::InvalidCredential,
            403 => FailureKind::PermissionDenied,
            429 => FailureKind::QuotaExceeded,
            _ => FailureKind::Request,
        },
        kind => kind,
    };

    TransportError::new(kind, message)
}

/// POST `payload` as JSON and decode a successful body as `R`.
pub async fn post_json<P, R>(
    client: &reqwest::Client,
    url: &str,
    api_key_header: Option<&str>,
    payload: &P,
) -> Result<R, TransportError>
where
    P: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(payload);
    if let Some(key) = api_key_header {
        request = request.header("x-goog-api-key", key);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let err = error_from_response(status.as_u16(), &body);
        if log::log_enabled!(log::Level::Error) {
            error!("jules::clients::common::post_json(...): {}", err);
        }
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|err| {
        TransportError::new(
            FailureKind::Request,
            format!("Malformed response body: {}", err),
        )
    })
}
