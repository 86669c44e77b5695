//! HTTP surface of the plan service
//!
//! Routes:
//!
//! - `POST /api/fitness-plan`: plan request; answers with one day, a JSON
//!   array of seven days, or an NDJSON stream of days
//! - `GET /health`: liveness plus the configured backend

pub mod error;

pub use error::{AppError, ErrorBody};

use crate::error::Result;
use crate::plan::DayPlan;
use crate::request::PlanRequest;
use crate::service::{PlanOutcome, PlanService};
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Path of the plan endpoint
pub const PLAN_PATH: &str = "/api/fitness-plan";

/// Content type of streamed weeks
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` when the process answers
    pub status: &'static str,
    /// Configured provider type
    pub provider: String,
    /// Active model, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Build the router around a shared service
pub fn build_router(service: Arc<PlanService>) -> Router {
    Router::new()
        .route(PLAN_PATH, post(fitness_plan))
        .route("/health", get(health))
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl+C
///
/// # Errors
///
/// Returns error if the address is invalid or cannot be bound
pub async fn run_serve(service: Arc<PlanService>, addr: &str) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let app = build_router(service);

    tracing::info!("fitplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health(State(service): State<Arc<PlanService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: service.provider_type().to_string(),
        model: service.model(),
    })
}

async fn fitness_plan(
    State(service): State<Arc<PlanService>>,
    body: Bytes,
) -> std::result::Result<Response, AppError> {
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| AppError::malformed_body(&e))?;
    let request = PlanRequest::from_value(&value)?;
    tracing::debug!(action = ?request.action(), "Plan request accepted");

    match service.handle(request).await? {
        PlanOutcome::Day(plan) => Ok(Json(plan).into_response()),
        PlanOutcome::Week(days) => Ok(Json(days).into_response()),
        PlanOutcome::WeekStream(mut days) => {
            // Before the first line is sent a failure can still be a proper
            // error object; after it, the only signal is a truncated body.
            let first = match days.next().await {
                Some(Ok(plan)) => plan,
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(ndjson_response(Body::empty())),
            };
            let lines = stream::once(async move { Ok::<_, anyhow::Error>(first) })
                .chain(days)
                .map(|item| item.and_then(|plan| encode_line(&plan)))
                .map(|item| {
                    item.map_err(|err| {
                        tracing::error!("Aborting week stream: {:#}", err);
                        std::io::Error::other(err.to_string())
                    })
                });
            Ok(ndjson_response(Body::from_stream(lines)))
        }
    }
}

fn ndjson_response(body: Body) -> Response {
    ([(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)], body).into_response()
}

/// One NDJSON line: compact JSON plus `\n`
pub fn encode_line(plan: &DayPlan) -> Result<Bytes> {
    let mut line = serde_json::to_vec(plan)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_plan_value;

    #[test]
    fn test_encode_line_is_single_line() {
        let plan = DayPlan::from_value(&sample_plan_value("Lunes")).unwrap();
        let line = encode_line(&plan).unwrap();
        let text = std::str::from_utf8(&line).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        let decoded: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(decoded["day"], "Lunes");
    }

    #[test]
    fn test_health_response_shape() {
        let body = serde_json::to_value(HealthResponse {
            status: "ok",
            provider: "ollama".into(),
            model: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok", "provider": "ollama" }));
    }
}
