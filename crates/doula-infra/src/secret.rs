//! Provider credential resolution.
//!
//! The API key is read once at startup from the environment variable named in
//! `[provider] api_key_env` and held as a [`SecretString`] from then on.

use secrecy::SecretString;
use doula_types::config::ProviderSettings;

/// Credential lookup failures. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("environment variable {0} is not set; export your provider API key before starting doula")]
    Missing(String),

    #[error("environment variable {0} is empty")]
    Empty(String),

    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(String),
}

/// Read the provider API key from the configured environment variable.
pub fn resolve_api_key(settings: &ProviderSettings) -> Result<SecretString, SecretError> {
    key_from(&settings.api_key_env, std::env::var(&settings.api_key_env))
}

fn key_from(
    var: &str,
    value: Result<String, std::env::VarError>,
) -> Result<SecretString, SecretError> {
    match value {
        Ok(val) if val.trim().is_empty() => Err(SecretError::Empty(var.to_string())),
        Ok(val) => Ok(SecretString::from(val.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Err(SecretError::Missing(var.to_string())),
        Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::NotUnicode(var.to_string())),
    }
}
