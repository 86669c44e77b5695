//! Terminal client for the plan service
//!
//! Sends plan requests over HTTP and re-validates every plan it receives
//! before handing it on. Whole weeks are accepted as a JSON array or as an
//! NDJSON stream, chosen by the response `Content-Type`. A streamed week
//! that ends before seven lines counts as failed.

pub mod render;
pub mod session;

pub use render::{render_day, render_received, render_week};
pub use session::{ReceivedDay, WeekSession};

use crate::config::ClientConfig;
use crate::error::{FitplanError, Result};
use crate::plan::DayPlan;
use crate::request::{AthleteProfile, PlanRequest};
use crate::server::NDJSON_CONTENT_TYPE;
use bytes::BytesMut;
use futures::StreamExt;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Days in a complete week
pub const WEEK_LENGTH: usize = 7;

/// Error object as sent by the service
#[derive(Debug, Deserialize)]
struct ErrorObject {
    error: String,
    #[serde(default)]
    details: Vec<IssueObject>,
}

#[derive(Debug, Deserialize)]
struct IssueObject {
    #[serde(default)]
    path: String,
    message: String,
}

/// HTTP client for `POST /api/fitness-plan`
#[derive(Debug, Clone)]
pub struct PlanClient {
    http: Client,
    base_url: String,
}

impl PlanClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("fitplan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FitplanError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, crate::server::PLAN_PATH)
    }

    async fn post(&self, request: &PlanRequest) -> Result<Response> {
        let url = self.endpoint();
        tracing::debug!(action = ?request.action(), "POST {}", url);
        let response = self.http.post(&url).json(&request.to_value()).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await.into())
        }
    }

    /// Generate a single named day
    ///
    /// # Errors
    ///
    /// [`FitplanError::Server`] for an error object, or
    /// [`FitplanError::InvalidResponse`] when the plan fails re-validation.
    pub async fn generate_day(&self, profile: &AthleteProfile, day: &str) -> Result<DayPlan> {
        let request = PlanRequest::GenerateDay {
            profile: profile.clone(),
            day: day.to_string(),
        };
        let value: Value = self.post(&request).await?.json().await?;
        validated(&value)
    }

    /// Rework `plan` following `instructions`
    ///
    /// # Errors
    ///
    /// Same as [`PlanClient::generate_day`].
    pub async fn edit_day(
        &self,
        profile: &AthleteProfile,
        plan: &DayPlan,
        instructions: &str,
    ) -> Result<DayPlan> {
        let request = PlanRequest::Edit {
            profile: profile.clone(),
            day: plan.day.clone(),
            existing_plan: plan.clone(),
            instructions: instructions.to_string(),
        };
        let value: Value = self.post(&request).await?.json().await?;
        validated(&value)
    }

    /// Generate a whole week
    ///
    /// `on_day` sees each entry as soon as it is received, which for a
    /// streamed week is before the next day has been generated.
    ///
    /// # Errors
    ///
    /// [`FitplanError::IncompleteWeek`] when fewer than seven days arrive;
    /// any days already passed to `on_day` are not returned.
    pub async fn generate_week(
        &self,
        profile: &AthleteProfile,
        mut on_day: impl FnMut(&ReceivedDay),
    ) -> Result<Vec<ReceivedDay>> {
        let request = PlanRequest::GenerateWeek {
            profile: profile.clone(),
        };
        let response = self.post(&request).await?;

        let is_stream = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(NDJSON_CONTENT_TYPE));

        let days = if is_stream {
            read_ndjson_week(response, &mut on_day).await?
        } else {
            let value: Value = response.json().await?;
            let Value::Array(items) = value else {
                return Err(anyhow::anyhow!("Expected a JSON array of days"));
            };
            let days: Vec<ReceivedDay> = items.iter().map(ReceivedDay::from_value).collect();
            days.iter().for_each(&mut on_day);
            days
        };

        if days.len() != WEEK_LENGTH {
            return Err(FitplanError::IncompleteWeek {
                received: days.len(),
                expected: WEEK_LENGTH,
            }
            .into());
        }
        Ok(days)
    }

    /// Fetch `GET /health`
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or unhealthy
    pub async fn health(&self) -> Result<Value> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await.into());
        }
        Ok(response.json().await?)
    }
}

fn validated(value: &Value) -> Result<DayPlan> {
    DayPlan::from_value(value).map_err(|issues| FitplanError::InvalidResponse { issues }.into())
}

async fn error_from_response(response: Response) -> FitplanError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorObject>(&text) {
        Ok(obj) if obj.details.is_empty() => obj.error,
        Ok(obj) => {
            let details: Vec<String> = obj
                .details
                .iter()
                .map(|d| {
                    if d.path.is_empty() {
                        d.message.clone()
                    } else {
                        format!("{}: {}", d.path, d.message)
                    }
                })
                .collect();
            format!("{} ({})", obj.error, details.join("; "))
        }
        Err(_) if text.is_empty() => "no error message".to_string(),
        Err(_) => text,
    };
    FitplanError::Server { status, message }
}

/// Read NDJSON lines until the body ends
///
/// A transport error mid-body is how the service signals a failed day, so
/// it ends the read like a normal close; the caller then sees a short week.
async fn read_ndjson_week(
    response: Response,
    on_day: &mut impl FnMut(&ReceivedDay),
) -> Result<Vec<ReceivedDay>> {
    let mut days = Vec::with_capacity(WEEK_LENGTH);
    let mut buffer = BytesMut::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!("Week stream aborted after {} days: {}", days.len(), e);
                return Ok(days);
            }
        };
        buffer.extend_from_slice(&chunk);

        while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
            let line = buffer.split_to(newline + 1);
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let day = ReceivedDay::from_line(line);
            if !day.is_valid() {
                tracing::warn!(day = ?day.label(), "Received day failed validation");
            }
            on_day(&day);
            days.push(day);
        }
    }

    if !buffer.iter().all(u8::is_ascii_whitespace) {
        tracing::warn!("Discarding unterminated trailing line in week stream");
    }
    Ok(days)
}
