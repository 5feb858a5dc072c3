//! Global configuration types for Doula.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! HTTP server, the chat history window and completion parameters, and the
//! completion provider.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Doula backend.
///
/// Loaded from `~/.doula/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub provider: ProviderSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `"*"` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Conversation settings: history window, persona, completion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent stored turns loaded into each prompt.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Fixed system instruction placed at the head of every prompt.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum output tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on the post-reply persistence write.
    #[serde(default = "default_persist_timeout_ms")]
    pub persist_timeout_ms: u64,

    /// Also persist the user's turn alongside the assistant reply.
    ///
    /// Off by default: clients normally write their own user turns.
    #[serde(default)]
    pub record_user_turns: bool,
}

fn default_window_size() -> usize {
    6
}

fn default_system_prompt() -> String {
    "You are a helpful pregnancy assistant.".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f64 {
    0.2
}

fn default_persist_timeout_ms() -> u64 {
    2000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            persist_timeout_ms: default_persist_timeout_ms(),
            record_user_turns: false,
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Preset name: "openai", "gemini", "mistral", or "glm".
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override the preset's base URL (e.g., a local OpenAI-compatible server).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}
