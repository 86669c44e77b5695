//! Configuration management for Fitplan
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! `FITPLAN_*` environment variables, command-line flags.

use crate::cli::{Cli, Commands};
use crate::error::{FitplanError, Result};
use crate::locale::Locale;
use crate::providers::PROVIDER_TYPES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable the Gemini SDKs read the API key from
pub const GEMINI_KEY_ENV: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

/// Main configuration structure for Fitplan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Text-generation backend settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Per-day generation behavior
    #[serde(default)]
    pub generation: GenerationConfig,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Terminal client settings
    #[serde(default)]
    pub client: ClientConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider configuration
///
/// Specifies which backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use (`gemini` or `ollama`)
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Per-call HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            request_timeout_seconds: default_request_timeout(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key; usually supplied through the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_api_base(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Per-day generation behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Attempts per day before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Language of prompts and weekday labels
    #[serde(default)]
    pub locale: Locale,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            locale: Locale::default(),
        }
    }
}

/// How a full week is delivered to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDelivery {
    /// One JSON array once all seven days are ready
    #[default]
    Batch,
    /// Newline-delimited JSON, one day per line as soon as it is ready
    Stream,
}

impl std::str::FromStr for WeekDelivery {
    type Err = FitplanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "stream" => Ok(Self::Stream),
            other => Err(FitplanError::Config(format!(
                "Invalid week delivery: {}. Must be one of: batch, stream",
                other
            ))),
        }
    }
}

/// HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Week delivery mode
    #[serde(default)]
    pub week_delivery: WeekDelivery,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            week_delivery: WeekDelivery::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Terminal client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the plan service
    #[serde(default = "default_client_base_url")]
    pub base_url: String,

    /// Timeout for one request to the service; weeks take several
    /// backend round-trips, so this is generous
    #[serde(default = "default_client_timeout")]
    pub timeout_seconds: u64,
}

fn default_client_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_client_timeout() -> u64 {
    900
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_client_base_url(),
            timeout_seconds: default_client_timeout(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json_format: bool,

    /// Also append log lines to this file
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file; a missing file means defaults
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse a YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FitplanError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FitplanError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply `FITPLAN_*` overrides read through `lookup`
    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Provider overrides
        if let Some(provider_type) = lookup("FITPLAN_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Some(timeout) = lookup("FITPLAN_REQUEST_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.provider.request_timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid FITPLAN_REQUEST_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        // The generic SDK variable is read first so the explicit one wins
        if let Some(key) = lookup(GEMINI_KEY_ENV) {
            self.provider.gemini.api_key = Some(key);
        }

        if let Some(key) = lookup("FITPLAN_GEMINI_API_KEY") {
            self.provider.gemini.api_key = Some(key);
        }

        if let Some(model) = lookup("FITPLAN_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Some(api_base) = lookup("FITPLAN_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Some(ollama_host) = lookup("FITPLAN_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Some(ollama_model) = lookup("FITPLAN_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        // Generation overrides
        if let Some(max_attempts) = lookup("FITPLAN_MAX_ATTEMPTS") {
            match max_attempts.parse() {
                Ok(value) => self.generation.max_attempts = value,
                Err(_) => tracing::warn!("Invalid FITPLAN_MAX_ATTEMPTS: {}", max_attempts),
            }
        }

        if let Some(locale) = lookup("FITPLAN_LOCALE") {
            match locale.parse() {
                Ok(value) => self.generation.locale = value,
                Err(_) => tracing::warn!("Invalid FITPLAN_LOCALE: {}", locale),
            }
        }

        // Server overrides
        if let Some(host) = lookup("FITPLAN_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("FITPLAN_SERVER_PORT") {
            match port.parse() {
                Ok(value) => self.server.port = value,
                Err(_) => tracing::warn!("Invalid FITPLAN_SERVER_PORT: {}", port),
            }
        }

        if let Some(delivery) = lookup("FITPLAN_WEEK_DELIVERY") {
            match delivery.parse() {
                Ok(value) => self.server.week_delivery = value,
                Err(_) => tracing::warn!("Invalid FITPLAN_WEEK_DELIVERY: {}", delivery),
            }
        }

        // Client overrides
        if let Some(base_url) = lookup("FITPLAN_BASE_URL") {
            self.client.base_url = base_url;
        }

        // Logging overrides
        if let Some(level) = lookup("FITPLAN_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(json_logs) = lookup("FITPLAN_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => tracing::warn!("Invalid value for FITPLAN_JSON_LOGS: {}", json_logs),
            }
        }

        if let Some(log_file) = lookup("FITPLAN_LOG_FILE") {
            self.logging.file_path = Some(PathBuf::from(log_file));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        if let Commands::Serve {
            provider,
            host,
            port,
            stream,
        } = &cli.command
        {
            if let Some(provider) = provider {
                self.provider.provider_type = provider.clone();
            }
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
            if *stream {
                self.server.week_delivery = WeekDelivery::Stream;
            }
        }

        if let Some(server) = cli.command.server_override() {
            self.client.base_url = server.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges.
    /// Credentials are checked separately by [`Config::validate_credentials`],
    /// since client commands never need them.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(FitplanError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !PROVIDER_TYPES.contains(&self.provider.provider_type.as_str()) {
            return Err(FitplanError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                PROVIDER_TYPES.join(", ")
            ))
            .into());
        }

        if self.provider.request_timeout_seconds == 0 {
            return Err(FitplanError::Config(
                "provider.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.generation.max_attempts == 0 {
            return Err(FitplanError::Config(
                "generation.max_attempts must be greater than 0".to_string(),
            )
            .into());
        }

        if self.generation.max_attempts > 10 {
            return Err(FitplanError::Config(
                "generation.max_attempts must be less than or equal to 10".to_string(),
            )
            .into());
        }

        if self.server.port == 0 {
            return Err(
                FitplanError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        check_http_url("client.base_url", &self.client.base_url)?;
        match self.provider.provider_type.as_str() {
            "gemini" => check_http_url("provider.gemini.api_base", &self.provider.gemini.api_base)?,
            "ollama" => check_http_url("provider.ollama.host", &self.provider.ollama.host)?,
            _ => {}
        }

        if self.client.timeout_seconds == 0 {
            return Err(FitplanError::Config(
                "client.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Check that the selected provider has the credentials it needs
    ///
    /// # Errors
    ///
    /// Returns [`FitplanError::MissingCredentials`] when the Gemini provider
    /// is selected without an API key.
    pub fn validate_credentials(&self) -> Result<()> {
        if self.provider.provider_type == "gemini" {
            let has_key = self
                .provider
                .gemini
                .api_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty());
            if !has_key {
                return Err(FitplanError::MissingCredentials(format!(
                    "gemini (set {} or FITPLAN_GEMINI_API_KEY)",
                    GEMINI_KEY_ENV
                ))
                .into());
            }
        }
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FitplanError::Config(format!("{} cannot be empty", field)).into());
    }
    let url = Url::parse(value)
        .map_err(|e| FitplanError::Config(format!("{} is not a valid URL: {}", field, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FitplanError::Config(format!(
            "{} must use http or https, got {}",
            field,
            url.scheme()
        ))
        .into());
    }
    Ok(())
}
