//! Error objects returned by the HTTP surface
//!
//! Every failure reaches the caller as `{"error": string}` with an optional
//! `details` array of field issues; internal errors are logged and replaced
//! with a generic message.

use crate::error::FitplanError;
use crate::plan::{SchemaIssue, SchemaIssues};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Message used for failures that carry no caller-facing detail
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Wire shape of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Field-level failures, for invalid requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<SchemaIssues>,
}

/// Error returned from handlers
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Option<SchemaIssues>,
}

impl AppError {
    /// 400 with field-level details
    pub fn invalid_request(issues: SchemaIssues) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request".to_string(),
            details: Some(issues),
        }
    }

    /// 400 for a body that is not JSON at all
    pub fn malformed_body(err: &serde_json::Error) -> Self {
        let mut issues = SchemaIssues::default();
        issues.push(SchemaIssue::new("", format!("Malformed JSON: {}", err)));
        Self::invalid_request(issues)
    }

    /// 400 with a message only
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    /// 500 with a caller-facing message
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<FitplanError>() {
            Ok(FitplanError::InvalidRequest { issues }) => Self::invalid_request(issues),
            Ok(e @ (FitplanError::UnrecognizedAction(_) | FitplanError::MissingFields(_))) => {
                Self::bad_request(e.to_string())
            }
            Ok(e @ FitplanError::GenerationExhausted { .. }) => Self::internal(e.to_string()),
            Ok(other) => {
                tracing::error!("Request failed: {}", other);
                Self::internal(GENERIC_ERROR_MESSAGE)
            }
            Err(other) => {
                tracing::error!("Request failed: {:#}", other);
                Self::internal(GENERIC_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
