//! Sampling parameters applied to a single generation request.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::jules::prompt::TaskParameters;

/// Sampling parameters for one request. Nothing here is persisted between calls.
///
/// Serializes with the camelCase field names used by the Gemini `generationConfig` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// Randomness of sampling, `0.0..=1.0`.
    pub temperature: f32,
    /// Upper bound on generated tokens, must be positive.
    pub max_output_tokens: u32,
    /// Number of highest-probability tokens considered at each step, must be positive.
    pub top_k: u32,
    /// Nucleus sampling mass, `0.0..=1.0`.
    pub top_p: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1000,
            top_k: 32,
            top_p: 1.0,
        }
    }
}

/// Raised by [`GenerationParameters::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidParameter {
    pub name: &'static str,
    pub reason: String,
}

impl fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid generation parameter `{}`: {}", self.name, self.reason)
    }
}

impl Error for InvalidParameter {}

impl GenerationParameters {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        check_unit_interval("temperature", self.temperature)?;
        check_unit_interval("topP", self.top_p)?;
        if self.max_output_tokens == 0 {
            return Err(InvalidParameter {
                name: "maxOutputTokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.top_k == 0 {
            return Err(InvalidParameter {
                name: "topK",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Return a copy with any sampling overrides found in task parameters applied.
    ///
    /// Recognised keys are `temperature`, `maxOutputTokens` (or its alias `maxTokens`), `topK`
    /// and `topP`. `maxOutputTokens` wins when both spellings are present. Values that are not
    /// numbers are ignored; range checks happen later in [`validate`](Self::validate).
    ///
    /// ```rust
    /// use jules::{GenerationParameters, TaskParameters};
    ///
    /// let mut task = TaskParameters::new();
    /// task.insert("temperature".into(), serde_json::json!(0.2));
    /// task.insert("participants".into(), serde_json::json!(4));
    ///
    /// let params = GenerationParameters::default().overridden_by(&task);
    /// assert_eq!(params.temperature, 0.2);
    /// assert_eq!(params.top_k, 32);
    /// ```
    pub fn overridden_by(mut self, task_parameters: &TaskParameters) -> Self {
        if let Some(value) = task_parameters.get("temperature").and_then(|v| v.as_f64()) {
            self.temperature = value as f32;
        }
        if let Some(value) = task_parameters.get("topP").and_then(|v| v.as_f64()) {
            self.top_p = value as f32;
        }
        let max_tokens = task_parameters
            .get("maxOutputTokens")
            .and_then(as_count)
            .or_else(|| task_parameters.get("maxTokens").and_then(as_count));
        if let Some(value) = max_tokens {
            self.max_output_tokens = value;
        }
        if let Some(value) = task_parameters.get("topK").and_then(as_count) {
            self.top_k = value;
        }
        self
    }
}

fn check_unit_interval(name: &'static str, value: f32) -> Result<(), InvalidParameter> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InvalidParameter {
            name,
            reason: format!("{} is outside 0.0..=1.0", value),
        })
    }
}

// Negative or fractional counts map to 0 so that validation reports them.
fn as_count(value: &serde_json::Value) -> Option<u32> {
    let n = value.as_f64()?;
    if n.fract() != 0.0 || n < 0.0 {
        return Some(0);
    }
    Some(n.min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_valid() {
        let params = GenerationParameters::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_output_tokens, 1000);
        assert_eq!(params.top_k, 32);
        assert_eq!(params.top_p, 1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = GenerationParameters::default()
            .with_temperature(1.5)
            .validate()
            .unwrap_err();
        assert_eq!(err.name, "temperature");

        let err = GenerationParameters::default()
            .with_max_output_tokens(0)
            .validate()
            .unwrap_err();
        assert_eq!(err.name, "maxOutputTokens");

        assert!(GenerationParameters::default().with_top_k(0).validate().is_err());
        assert!(GenerationParameters::default().with_top_p(-0.1).validate().is_err());
    }

    #[test]
    fn test_serializes_as_generation_config() {
        let value = serde_json::to_value(GenerationParameters::default()).unwrap();
        assert_eq!(value["maxOutputTokens"], json!(1000));
        assert_eq!(value["topK"], json!(32));
        assert!(value.get("max_output_tokens").is_none());
    }

    #[test]
    fn test_overrides_from_task_parameters() {
        let mut task = TaskParameters::new();
        task.insert("maxOutputTokens".into(), json!(256));
        task.insert("topK".into(), json!(-3));
        task.insert("topP".into(), json!("high"));

        let params = GenerationParameters::default().overridden_by(&task);
        assert_eq!(params.max_output_tokens, 256);
        assert_eq!(params.top_k, 0);
        assert_eq!(params.top_p, 1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_max_tokens_alias() {
        let mut task = TaskParameters::new();
        task.insert("maxTokens".into(), json!(150));
        let params = GenerationParameters::default().overridden_by(&task);
        assert_eq!(params.max_output_tokens, 150);

        task.insert("maxOutputTokens".into(), json!(400));
        let params = GenerationParameters::default().overridden_by(&task);
        assert_eq!(params.max_output_tokens, 400);
    }
}
