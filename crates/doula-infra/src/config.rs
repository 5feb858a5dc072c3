//! Global configuration loader for Doula.
//!
//! Reads `config.toml` from the data directory (`~/.doula/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use doula_types::config::GlobalConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "DOULA_DATA_DIR";

/// Resolve the data directory: `$DOULA_DATA_DIR`, then `~/.doula`, then `./.doula`.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn data_dir_from(env_override: Option<PathBuf>) -> PathBuf {
    env_override
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| dirs::home_dir().map(|home| home.join(".doula")))
        .unwrap_or_else(|| PathBuf::from(".doula"))
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 9000

[chat]
window_size = 10
record_user_turns = true

[provider]
name = "mistral"
model = "mistral-small-latest"
api_key_env = "MISTRAL_API_KEY"
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chat.window_size, 10);
        assert!(config.chat.record_user_turns);
        assert_eq!(config.chat.max_tokens, 500);
        assert_eq!(config.provider.name, "mistral");
        assert_eq!(config.provider.api_key_env, "MISTRAL_API_KEY");
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn data_dir_prefers_env_override() {
        let dir = data_dir_from(Some(PathBuf::from("/srv/doula")));
        assert_eq!(dir, PathBuf::from("/srv/doula"));
    }

    #[test]
    fn data_dir_ignores_empty_override() {
        let dir = data_dir_from(Some(PathBuf::new()));
        assert!(dir.ends_with(".doula"));
    }
}
