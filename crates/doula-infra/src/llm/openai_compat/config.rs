//! Configuration and per-provider presets for OpenAI-compatible endpoints.
//!
//! Every preset speaks the OpenAI chat completions protocol; only the
//! provider name and base URL differ.

use secrecy::SecretString;

/// Configuration for an OpenAI-compatible completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "gemini").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model, used when a request leaves its model empty.
    pub model: String,
}

/// Base URL for a known preset name, or `None` for unknown names.
pub fn preset_base_url(name: &str) -> Option<&'static str> {
    match name {
        "openai" => Some("https://api.openai.com/v1"),
        "gemini" => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
        "mistral" => Some("https://api.mistral.ai/v1"),
        "glm" => Some("https://api.z.ai/api/paas/v4"),
        _ => None,
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("openai", api_key, model)
}

/// Google Gemini default configuration (OpenAI-compatible beta endpoint).
pub fn gemini_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("gemini", api_key, model)
}

/// Mistral AI default configuration.
pub fn mistral_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("mistral", api_key, model)
}

/// GLM (z.ai) default configuration.
pub fn glm_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    preset("glm", api_key, model)
}

fn preset(name: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: name.into(),
        base_url: preset_base_url(name)
            .unwrap_or("https://api.openai.com/v1")
            .into(),
        api_key,
        model: model.into(),
    }
}
