//! Google Gemini provider implementation for Fitplan
//!
//! Calls the Generative Language `generateContent` endpoint with
//! `responseMimeType: application/json` and a `responseSchema`, so the model
//! output is constrained to the declared shape. The JSON Schema handed to
//! [`Provider::generate`] is converted to the OpenAPI subset Gemini accepts.

use crate::config::GeminiConfig;
use crate::error::{FitplanError, Result};
use crate::providers::{
    parse_json_output, Generation, GenerationRequest, Provider, ProviderCapabilities, TokenUsage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use fitplan::config::GeminiConfig;
/// use fitplan::providers::{GeminiProvider, GenerationRequest, Provider};
/// use fitplan::plan::day_plan_json_schema;
/// use std::time::Duration;
///
/// # async fn example() -> fitplan::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("secret".to_string()),
///     ..Default::default()
/// };
/// let provider = GeminiProvider::new(config, Duration::from_secs(120))?;
/// let request = GenerationRequest::new("Plan for Monday", "day_plan", day_plan_json_schema());
/// let generation = provider.generate(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

/// Gemini error envelope: `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns [`FitplanError::MissingCredentials`] when no API key is
    /// configured, or a provider error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FitplanError::MissingCredentials("gemini".to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fitplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FitplanError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: to_gemini_schema(&request.schema),
            },
        }
    }
}

/// Convert a JSON Schema into Gemini's OpenAPI-subset schema
///
/// Type names are upper-cased, `["T", "null"]` unions become `T` with
/// `nullable: true`, and keywords Gemini rejects are dropped.
///
/// # Examples
///
/// ```
/// use fitplan::providers::gemini::to_gemini_schema;
/// use serde_json::json;
///
/// let converted = to_gemini_schema(&json!({ "type": ["integer", "null"] }));
/// assert_eq!(converted, json!({ "type": "INTEGER", "nullable": true }));
/// ```
pub fn to_gemini_schema(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in obj {
        match key.as_str() {
            "type" => match value {
                Value::String(t) => {
                    out.insert("type".to_string(), Value::String(t.to_uppercase()));
                }
                Value::Array(types) => {
                    let mut nullable = false;
                    let mut concrete = None;
                    for t in types.iter().filter_map(Value::as_str) {
                        if t == "null" {
                            nullable = true;
                        } else if concrete.is_none() {
                            concrete = Some(t.to_uppercase());
                        }
                    }
                    if let Some(t) = concrete {
                        out.insert("type".to_string(), Value::String(t));
                    }
                    if nullable {
                        out.insert("nullable".to_string(), Value::Bool(true));
                    }
                }
                _ => {}
            },
            "properties" => {
                if let Some(props) = value.as_object() {
                    let converted = props
                        .iter()
                        .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                        .collect::<Map<_, _>>();
                    out.insert("properties".to_string(), Value::Object(converted));
                }
            }
            "items" => {
                out.insert("items".to_string(), to_gemini_schema(value));
            }
            "required" | "enum" | "description" | "format" | "nullable" => {
                out.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    Value::Object(out)
}

fn format_gemini_api_error(status: reqwest::StatusCode, body: &str) -> FitplanError {
    let detail = serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|envelope| {
            if envelope.error.status.is_empty() {
                envelope.error.message
            } else {
                format!("{} ({})", envelope.error.message, envelope.error.status)
            }
        })
        .unwrap_or_else(|_| body.to_string());

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        FitplanError::Provider(format!("Gemini rejected the API key ({}): {}", status, detail))
    } else {
        FitplanError::Provider(format!("Gemini returned error {}: {}", status, detail))
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let url = self.endpoint();
        let body = self.build_request(request);

        tracing::debug!(schema = %request.schema_name, "Sending Gemini request to {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                FitplanError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(format_gemini_api_error(status, &error_text).into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            FitplanError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let Some(candidate) = gemini_response.candidates.into_iter().next() else {
            let reason = gemini_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(FitplanError::Provider(format!("Gemini returned no output: {}", reason)).into());
        };

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        tracing::debug!(
            finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
            "Gemini response received"
        );

        if text.trim().is_empty() {
            return Err(FitplanError::Provider(format!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
            .into());
        }

        let value = parse_json_output(&text)?;
        Ok(match gemini_response.usage_metadata {
            Some(usage) => Generation::with_usage(
                value,
                TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
            ),
            None => Generation::new(value),
        })
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
    use serde_json::json;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_base: "https://example.test/".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: Some("k".to_string()),
        }
    }

    #[test]
    fn test_missing_api_key_is_missing_credentials() {
        let cfg = GeminiConfig {
            api_key: None,
            ..config()
        };
        let err = GeminiProvider::new(cfg, Duration::from_secs(1)).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<FitplanError>(),
            Some(FitplanError::MissingCredentials(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_blank_api_key_is_missing_credentials() {
        let cfg = GeminiConfig {
            api_key: Some("  ".to_string()),
            ..config()
        };
        assert!(GeminiProvider::new(cfg, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(config(), Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_shape() {
        let provider = GeminiProvider::new(config(), Duration::from_secs(1)).unwrap();
        let request =
            provider.build_request(&GenerationRequest::new("hola", "day_plan", day_plan_json_schema()));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_schema_conversion_nested() {
        let converted = to_gemini_schema(&day_plan_json_schema());
        let exercise = &converted["properties"]["workout"]["properties"]["exercises"];
        assert_eq!(exercise["type"], "ARRAY");
        assert!(exercise.get("minItems").is_none());
        assert_eq!(exercise["items"]["properties"]["reps"], json!({ "type": "INTEGER", "nullable": true }));
        assert_eq!(exercise["items"]["required"], json!(["name", "sets"]));
    }

    #[test]
    fn test_format_api_error_uses_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let err = format_gemini_api_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(err.to_string().contains("API key not valid (INVALID_ARGUMENT)"));
    }

    #[test]
    fn test_format_api_error_unauthorized() {
        let err = format_gemini_api_error(reqwest::StatusCode::FORBIDDEN, "denied");
        assert!(err.to_string().contains("rejected the API key"));
    }

    #[test]
    fn test_response_deserialize_without_usage() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] }, "finishReason": "STOP" }]
        }))
        .unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert!(response.usage_metadata.is_none());
    }
}
