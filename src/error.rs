//! Error types for Fitplan
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use crate::plan::SchemaIssues;
use thiserror::Error;

/// Main error type for Fitplan operations
///
/// Covers configuration loading, backend provider calls, request
/// validation, per-day generation and the client side of the HTTP
/// contract. Request-level variants are mapped to HTTP status codes by
/// the server module.
#[derive(Error, Debug)]
pub enum FitplanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed backend payloads)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Backend answered, but its text could not be parsed as JSON
    #[error("Model output is not valid JSON: {0}")]
    MalformedOutput(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Request body failed shape validation
    #[error("Invalid request: {issues}")]
    InvalidRequest {
        /// Field-level validation failures
        issues: SchemaIssues,
    },

    /// `action` was a string outside the known set
    #[error("Unrecognized action: {0}")]
    UnrecognizedAction(String),

    /// Action-specific required fields were absent
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    /// Every attempt to generate a day failed
    #[error("Could not generate the plan for {day} after {attempts} attempts")]
    GenerationExhausted {
        /// Day label that could not be generated
        day: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// A received day plan failed client-side validation
    #[error("Received plan failed validation: {issues}")]
    InvalidResponse {
        /// Field-level validation failures
        issues: SchemaIssues,
    },

    /// A streamed week ended before every day arrived
    #[error("Week stream ended after {received} of {expected} days")]
    IncompleteWeek {
        /// Number of days received before the stream ended
        received: usize,
        /// Number of days expected
        expected: usize,
    },

    /// The plan service answered with an error object
    #[error("Plan service returned {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message from the error object
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Fitplan operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
