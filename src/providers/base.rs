//! Base provider trait and common types for Fitplan
//!
//! This module defines the Provider trait that every text-generation backend
//! implements, along with the request/response types exchanged with it.

use crate::error::{FitplanError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token usage information from a generation
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use fitplan::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A request for one structured object
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Natural-language instruction
    pub prompt: String,
    /// Short identifier for the expected object (e.g. `day_plan`)
    pub schema_name: String,
    /// JSON Schema the output must conform to
    pub schema: serde_json::Value,
}

impl GenerationRequest {
    /// Create a new request
    pub fn new(
        prompt: impl Into<String>,
        schema_name: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            schema_name: schema_name.into(),
            schema,
        }
    }
}

/// Object produced by a backend, not yet validated
#[derive(Debug, Clone)]
pub struct Generation {
    /// Parsed JSON output
    pub value: serde_json::Value,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl Generation {
    /// Create a generation without usage information
    pub fn new(value: serde_json::Value) -> Self {
        Self { value, usage: None }
    }

    /// Create a generation with usage information
    pub fn with_usage(value: serde_json::Value, usage: TokenUsage) -> Self {
        Self {
            value,
            usage: Some(usage),
        }
    }
}

/// Provider capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Backend constrains its output to the declared schema
    pub supports_native_schema: bool,
    /// Backend reports token counts
    pub supports_token_counts: bool,
}

/// Provider trait for text-generation backends
///
/// # Examples
///
/// ```no_run
/// use fitplan::providers::{Generation, GenerationRequest, Provider};
/// use fitplan::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
///         Ok(Generation::new(serde_json::json!({ "prompt": request.prompt })))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Produce one JSON object for the request
    ///
    /// # Errors
    ///
    /// Returns error if the call fails, the backend answers with an error
    /// status, or its output is not parseable JSON. Conformance to the
    /// schema is checked by the caller.
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;

    /// Get the name of the currently active model
    ///
    /// # Default Implementation
    ///
    /// Returns an error indicating the information is unavailable.
    fn get_current_model(&self) -> Result<String> {
        Err(FitplanError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }

    /// Get the capabilities of this provider
    ///
    /// # Default Implementation
    ///
    /// All features disabled.
    fn get_provider_capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }
}

/// Parse a JSON object out of free model text
///
/// Accepts bare JSON, JSON wrapped in Markdown code fences, and JSON
/// surrounded by stray prose (the outermost `{...}` span is used).
///
/// # Errors
///
/// Returns [`FitplanError::MalformedOutput`] when no JSON object can be
/// recovered.
///
/// # Examples
///
/// ```
/// use fitplan::providers::parse_json_output;
///
/// let value = parse_json_output("```json\n{\"day\": \"Lunes\"}\n```").unwrap();
/// assert_eq!(value["day"], "Lunes");
/// ```
pub fn parse_json_output(text: &str) -> Result<serde_json::Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fence(trimmed);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(unfenced) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&unfenced[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(FitplanError::MalformedOutput(preview(trimmed)).into())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    }
}
