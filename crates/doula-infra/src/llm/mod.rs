//! Completion provider implementations.
//!
//! Provides a provider factory ([`create_provider`]) that builds the
//! OpenAI-compatible provider from [`ProviderSettings`] and a resolved key.

pub mod openai_compat;

use secrecy::SecretString;

use doula_core::llm::box_provider::BoxLlmProvider;
use doula_types::config::ProviderSettings;
use doula_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{self as presets, OpenAiCompatConfig};

/// Create a [`BoxLlmProvider`] from provider settings.
///
/// An explicit `base_url` wins over the preset; otherwise the preset is
/// inferred from `settings.name`.
///
/// # Errors
///
/// Returns `LlmError::InvalidRequest` for an unknown preset name without a
/// `base_url`.
pub fn create_provider(
    settings: &ProviderSettings,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let config = match settings.base_url.as_deref() {
        Some(base_url) => OpenAiCompatConfig {
            provider_name: settings.name.clone(),
            base_url: base_url.to_string(),
            api_key,
            model: settings.model.clone(),
        },
        None => match settings.name.as_str() {
            "openai" => presets::openai_defaults(api_key, &settings.model),
            "gemini" => presets::gemini_defaults(api_key, &settings.model),
            "mistral" => presets::mistral_defaults(api_key, &settings.model),
            "glm" => presets::glm_defaults(api_key, &settings.model),
            other => {
                return Err(LlmError::InvalidRequest(format!(
                    "unknown provider '{other}' (set provider.base_url for custom endpoints)"
                )));
            }
        },
    };

    tracing::debug!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        model = %config.model,
        "Created completion provider"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("sk-test".to_string())
    }

    #[test]
    fn test_create_default_provider() {
        let provider = create_provider(&ProviderSettings::default(), key()).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_custom_base_url() {
        let settings = ProviderSettings {
            name: "local".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..ProviderSettings::default()
        };
        let provider = create_provider(&settings, key()).unwrap();
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let settings = ProviderSettings {
            name: "acme".to_string(),
            ..ProviderSettings::default()
        };
        assert!(matches!(
            create_provider(&settings, key()),
            Err(LlmError::InvalidRequest(_))
        ));
    }
}
