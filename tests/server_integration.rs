//! HTTP surface tests for `POST /api/fitness-plan`
//!
//! Requests go through the real router via `tower::ServiceExt::oneshot`;
//! the backend is a scripted in-process provider.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{plan_value, queue_service, spanish_week};
use fitplan::config::WeekDelivery;
use fitplan::server::{build_router, NDJSON_CONTENT_TYPE, PLAN_PATH};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const BODY_LIMIT: usize = 1_048_576;

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(PLAN_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn post_json(body: &Value) -> Request<Body> {
    post(body.to_string())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn generate_day(day: &str) -> Value {
    json!({
        "action": "generate",
        "fitnessGoals": "ganar fuerza",
        "fitnessLevel": "intermedio",
        "day": day
    })
}

fn generate_week() -> Value {
    json!({
        "action": "generate",
        "fitnessGoals": "ganar fuerza",
        "fitnessLevel": "intermedio",
        "availableEquipment": "mancuernas"
    })
}

#[tokio::test]
async fn test_generate_day_returns_plan_for_requested_label() {
    let (service, provider) =
        queue_service(vec![Some(plan_value("Domingo"))], WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(post_json(&generate_day("Lunes")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["day"], "Lunes");
    assert_eq!(body["workout"]["exercises"][0]["name"], "Sentadillas");
    assert_eq!(provider.prompts().len(), 1);
    assert!(provider.prompts()[0].contains("Lunes"));
}

#[tokio::test]
async fn test_missing_action_is_400_with_details() {
    let (service, provider) = queue_service(vec![], WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(post_json(&json!({ "fitnessGoals": "x", "fitnessLevel": "y" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["path"] == "action"));
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let (service, _) = queue_service(vec![], WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(post("{\"action\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_action_is_400() {
    let (service, _) = queue_service(vec![], WeekDelivery::Batch, 3);
    let mut body = generate_day("Lunes");
    body["action"] = json!("delete");

    let response = build_router(service).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("delete"));
}

#[tokio::test]
async fn test_edit_without_instructions_is_400() {
    let (service, provider) = queue_service(vec![], WeekDelivery::Batch, 3);
    let body = json!({
        "action": "edit",
        "day": "Lunes",
        "existingPlan": plan_value("Lunes")
    });

    let response = build_router(service).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("editInstructions"));
    assert!(provider.prompts().is_empty());
}

#[tokio::test]
async fn test_edit_keeps_existing_day_label() {
    let (service, provider) =
        queue_service(vec![Some(plan_value("Viernes"))], WeekDelivery::Batch, 3);
    let body = json!({
        "action": "edit",
        "day": "Martes",
        "existingPlan": plan_value("Martes"),
        "editInstructions": "añade 10 minutos de cardio"
    });

    let response = build_router(service).oneshot(post_json(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["day"], "Martes");
    assert!(provider.prompts()[0].contains("añade 10 minutos de cardio"));
}

#[tokio::test]
async fn test_exhausted_day_is_500_naming_day() {
    let (service, provider) = queue_service(vec![None, None, None], WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(post_json(&generate_day("Jueves")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Jueves"));
    assert_eq!(provider.prompts().len(), 3);
}

#[tokio::test]
async fn test_schema_failure_is_retried() {
    let (service, provider) = queue_service(
        vec![Some(json!({ "day": "Lunes" })), Some(plan_value("Lunes"))],
        WeekDelivery::Batch,
        3,
    );

    let response = build_router(service)
        .oneshot(post_json(&generate_day("Lunes")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], prompts[1]);
}

#[tokio::test]
async fn test_batch_week_returns_seven_days_in_order() {
    let replies = spanish_week().into_iter().map(Some).collect();
    let (service, provider) = queue_service(replies, WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(post_json(&generate_week()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let days: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["day"].as_str().unwrap())
        .collect();
    assert_eq!(
        days,
        ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"]
    );

    // Later prompts carry the days already generated
    let prompts = provider.prompts();
    assert!(!prompts[0].contains("Día Lunes:"));
    assert!(prompts[6].contains("Día Lunes:"));
    assert!(prompts[6].contains("Día Sábado:"));
}

#[tokio::test]
async fn test_batch_week_failure_returns_no_days() {
    let mut replies: Vec<Option<Value>> = spanish_week().into_iter().take(3).map(Some).collect();
    replies.push(None);
    let (service, _) = queue_service(replies, WeekDelivery::Batch, 1);

    let response = build_router(service)
        .oneshot(post_json(&generate_week()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Jueves"));
}

#[tokio::test]
async fn test_streamed_week_is_ndjson() {
    let replies = spanish_week().into_iter().map(Some).collect();
    let (service, _) = queue_service(replies, WeekDelivery::Stream, 3);

    let response = build_router(service)
        .oneshot(post_json(&generate_week()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        NDJSON_CONTENT_TYPE
    );
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0]["day"], "Lunes");
    assert_eq!(lines[6]["day"], "Domingo");
}

#[tokio::test]
async fn test_streamed_week_first_day_failure_is_error_object() {
    let (service, _) = queue_service(vec![None], WeekDelivery::Stream, 1);

    let response = build_router(service)
        .oneshot(post_json(&generate_week()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("Lunes"));
}

#[tokio::test]
async fn test_streamed_week_truncates_after_failure() {
    let replies = vec![Some(plan_value("Lunes")), Some(plan_value("Martes")), None];
    let (service, _) = queue_service(replies, WeekDelivery::Stream, 1);

    let response = build_router(service)
        .oneshot(post_json(&generate_week()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut chunks = response.into_body().into_data_stream();
    let mut received = Vec::new();
    let mut aborted = false;
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(bytes) => received.extend_from_slice(&bytes),
            Err(_) => {
                aborted = true;
                break;
            }
        }
    }

    assert!(aborted);
    let text = String::from_utf8(received).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn test_health_reports_provider() {
    let (service, _) = queue_service(vec![], WeekDelivery::Batch, 3);

    let response = build_router(service)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "queue");
    assert_eq!(body["model"], "queue-model");
}
