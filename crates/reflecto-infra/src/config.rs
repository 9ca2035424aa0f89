//! Configuration loader for Reflecto.
//!
//! Reads `config.toml` from the data directory (`~/.reflecto/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use reflecto_types::config::AppConfig;

/// Environment variable overriding the data directory.
const DATA_DIR_ENV: &str = "REFLECTO_DATA_DIR";

/// Environment variable carrying the completion API key.
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Otherwise returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: `REFLECTO_DATA_DIR` env var, then `~/.reflecto`, then
/// `./.reflecto` when no home directory is available.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".reflecto"),
        None => PathBuf::from(".reflecto"),
    }
}

/// Read the completion API key from the environment.
///
/// Returns `None` when unset or empty; callers decide whether that is
/// fatal (the server refuses to start without one).
pub fn api_key_from_env() -> Option<SecretString> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Some(SecretString::from(key)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.model.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
preamble = "Keep answers short."

[server]
port = 8081

[model]
model = "gpt-4o"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.preamble, "Keep answers short.");
        // Untouched fields keep their defaults.
        assert_eq!(config.model.max_tokens, 500);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.server.port, 3000);
        assert!(config.preamble.starts_with("You are Reflecto"));
    }
}
