//! Ollama provider implementation for Fitplan
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server. The expected JSON Schema is passed through the
//! `format` field of `/api/chat`; the returned message text is then parsed
//! as JSON.

use crate::config::OllamaConfig;
use crate::error::{FitplanError, Result};
use crate::providers::{
    parse_json_output, Generation, GenerationRequest, Provider, ProviderCapabilities, TokenUsage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use fitplan::config::OllamaConfig;
/// use fitplan::providers::{GenerationRequest, OllamaProvider, Provider};
/// use fitplan::plan::day_plan_json_schema;
/// use std::time::Duration;
///
/// # async fn example() -> fitplan::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), Duration::from_secs(120))?;
/// let request = GenerationRequest::new("Plan for Monday", "day_plan", day_plan_json_schema());
/// let generation = provider.generate(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    format: serde_json::Value,
    stream: bool,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::config::OllamaConfig;
    /// use fitplan::providers::OllamaProvider;
    /// use std::time::Duration;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), Duration::from_secs(30));
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fitplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FitplanError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, request: &GenerationRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.config.model.clone(),
            messages: vec![OllamaMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            format: request.schema.clone(),
            stream: false,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let ollama_request = self.build_request(request);

        tracing::debug!(
            schema = %request.schema_name,
            "Sending Ollama request to {}",
            url
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                FitplanError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(FitplanError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            FitplanError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let value = parse_json_output(&ollama_response.message.content)?;

        let generation = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0
        {
            Generation::with_usage(
                value,
                TokenUsage::new(ollama_response.prompt_eval_count, ollama_response.eval_count),
            )
        } else {
            Generation::new(value)
        };

        Ok(generation)
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }

    fn get_provider_capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_native_schema: true,
            supports_token_counts: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::day_plan_json_schema;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(
            OllamaConfig {
                host: "http://localhost:11434".to_string(),
                model: "llama3.2:latest".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_ollama_provider_host_and_model() {
        let provider = provider();
        assert_eq!(provider.host(), "http://localhost:11434");
        assert_eq!(provider.model(), "llama3.2:latest");
        assert_eq!(provider.get_current_model().unwrap(), "llama3.2:latest");
    }

    #[test]
    fn test_build_request_carries_schema_as_format() {
        let provider = provider();
        let request = provider.build_request(&GenerationRequest::new(
            "plan",
            "day_plan",
            day_plan_json_schema(),
        ));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3.2:latest");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "plan");
        assert_eq!(json["format"]["type"], "object");
    }

    #[test]
    fn test_response_deserialize_missing_counts() {
        let response: OllamaResponse = serde_json::from_str(
            r#"{"message":{"role":"assistant","content":"{}"},"done":true}"#,
        )
        .unwrap();
        assert!(response.done);
        assert_eq!(response.prompt_eval_count, 0);
        assert_eq!(response.message.content, "{}");
    }

    #[test]
    fn test_provider_capabilities() {
        let caps = provider().get_provider_capabilities();
        assert!(caps.supports_native_schema);
        assert!(caps.supports_token_counts);
    }
}
