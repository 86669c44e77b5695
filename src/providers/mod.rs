//! Provider module for Fitplan
//!
//! This module contains the text-generation backend abstraction and the
//! implementations for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{
    parse_json_output, Generation, GenerationRequest, Provider, ProviderCapabilities, TokenUsage,
};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{FitplanError, Result};
use std::time::Duration;

/// Provider types accepted in configuration
pub const PROVIDER_TYPES: [&str; 2] = ["gemini", "ollama"];

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration; `provider_type` selects the backend
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
/// (for Gemini, a missing API key is a [`FitplanError::MissingCredentials`]).
///
/// # Examples
///
/// ```
/// use fitplan::config::ProviderConfig;
/// use fitplan::providers::create_provider;
///
/// let config = ProviderConfig {
///     provider_type: "ollama".to_string(),
///     ..Default::default()
/// };
/// let provider = create_provider(&config).unwrap();
/// assert_eq!(provider.get_current_model().unwrap(), "llama3.2:latest");
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);
    match config.provider_type.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone(), timeout)?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone(), timeout)?)),
        other => Err(FitplanError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
