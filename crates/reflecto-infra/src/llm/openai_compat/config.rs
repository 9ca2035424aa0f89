//! Configuration and per-provider defaults for OpenAI-compatible backends.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct
//! base URL.

/// Configuration for an OpenAI-compatible completion backend.
///
/// Used to construct an [`super::OpenAiCompatibleClient`].
pub struct OpenAiCompatConfig {
    /// Human-readable backend name (e.g., "openai").
    pub name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
    }
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key: api_key.into(),
    }
}

/// Mistral AI default configuration.
///
/// Base URL: `https://api.mistral.ai/v1`
pub fn mistral_defaults(api_key: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        name: "mistral".into(),
        base_url: "https://api.mistral.ai/v1".into(),
        api_key: api_key.into(),
    }
}
