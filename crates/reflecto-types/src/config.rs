//! Application configuration types for Reflecto.
//!
//! `AppConfig` represents the top-level `config.toml` controlling the HTTP
//! server, the completion model, and the assistant preamble. All fields
//! have defaults so an empty or missing file yields a working setup.

use serde::{Deserialize, Serialize};

use crate::llm::ModelParams;

/// Default system preamble establishing the assistant persona.
///
/// Pinned at index 0 of every fresh conversation and never evicted.
pub const DEFAULT_PREAMBLE: &str = "You are Reflecto, a helpful, friendly, \
    and thoughtful assistant who helps users reflect on their thoughts and questions.";

/// Top-level configuration, loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Sampling parameters for every completion call.
    #[serde(default)]
    pub model: ModelParams,

    /// System preamble for fresh conversations.
    #[serde(default = "default_preamble")]
    pub preamble: String,
}

fn default_preamble() -> String {
    DEFAULT_PREAMBLE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelParams::default(),
            preamble: default_preamble(),
        }
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert!(config.preamble.starts_with("You are Reflecto"));
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.model.max_tokens, 500);
        assert_eq!(config.preamble, DEFAULT_PREAMBLE);
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
preamble = "You are a terse assistant."

[server]
port = 8080

[model]
model = "gpt-4o"
max_tokens = 1024
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.model.max_tokens, 1024);
        assert_eq!(config.preamble, "You are a terse assistant.");
    }
}
