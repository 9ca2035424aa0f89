//! LLM request types and provider error taxonomy for Reflecto.
//!
//! These types model the single remote capability the core consumes: a
//! completion call over a bounded turn sequence with a fixed set of
//! sampling parameters.

use serde::{Deserialize, Serialize};

use crate::turn::Turn;

/// Fixed sampling configuration for completion calls.
///
/// One `ModelParams` is built at startup and reused for every request;
/// the proxy does not vary parameters per turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Model identifier (e.g., "gpt-4o-mini").
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens the model may generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default)]
    pub frequency_penalty: f64,
    #[serde(default)]
    pub presence_penalty: f64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    1.0
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Request to an LLM provider for a completion.
///
/// Carries the full bounded turn sequence (system preamble included) as
/// context, plus the fixed sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub params: ModelParams,
    pub turns: Vec<Turn>,
}

/// Errors from LLM provider operations.
///
/// Structured variants are preferred when the provider client can classify
/// the failure; `Provider` carries the free-text channel for everything
/// else, and the orchestrator applies substring rules to that message.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_params_defaults() {
        let params = ModelParams::default();
        assert_eq!(params.model, "gpt-4o-mini");
        assert_eq!(params.max_tokens, 500);
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
        assert!((params.top_p - 1.0).abs() < f64::EPSILON);
        assert!(params.frequency_penalty.abs() < f64::EPSILON);
        assert!(params.presence_penalty.abs() < f64::EPSILON);
    }

    #[test]
    fn test_model_params_deserialize_with_defaults() {
        let toml_str = r#"model = "gpt-4o""#;
        let params: ModelParams = toml::from_str(toml_str).unwrap();
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.max_tokens, 500);
        assert!((params.top_p - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            message: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: connection reset");

        let err = LlmError::InvalidRequest("bad model".to_string());
        assert_eq!(err.to_string(), "invalid request: bad model");
    }
}
