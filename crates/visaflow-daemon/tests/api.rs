//! REST API integration tests: the router is exercised in-process with
//! `tower::ServiceExt::oneshot`, no listener involved.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use visaflow_daemon::api::create_router;
use visaflow_daemon::api::rest::state::AppState;
use visaflow_daemon::storage::InMemorySessionStore;
use visaflow_engine::SessionEngine;

fn app() -> Router {
    let state = AppState::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(SessionEngine::new()),
    );
    create_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_session(app: &Router, intent: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({"intent": intent})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn catalog_endpoints_list_flows_and_scenarios() {
    let app = app();

    let (status, flows) = send(&app, Method::GET, "/api/v1/flows", None).await;
    assert_eq!(status, StatusCode::OK);
    let flows = flows.as_array().unwrap();
    assert_eq!(flows.len(), 5);
    assert!(flows.iter().any(|f| f["flow_id"] == "cpt_prep"));

    let (status, scenarios) = send(&app, Method::GET, "/api/v1/scenarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!scenarios["scenarios"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn session_creation_routes_and_persists() {
    let app = app();
    let body = create_session(&app, "I'm on CPT and start my internship in 3 weeks").await;

    assert_eq!(body["session"]["selected_flow_id"], "cpt_prep");
    assert!(!body["micro_checks"].as_array().unwrap().is_empty());
    assert!(body["mutation"]["reason"].is_string());

    let id = body["session"]["session_id"].as_str().unwrap();
    let (status, fetched) =
        send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["selected_flow_id"], "cpt_prep");
}

#[tokio::test]
async fn sessions_can_be_listed_and_deleted() {
    let app = app();
    let body = create_session(&app, "I'm on CPT and start my internship in 3 weeks").await;
    let id = body["session"]["session_id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, Method::GET, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed["session_ids"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v.as_str() == Some(id.as_str())));

    let (status, _) =
        send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) =
        send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn short_intent_is_a_validation_error() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({"intent": "cpt"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unsupported_event_is_rejected_without_side_effects() {
    let app = app();
    let body = create_session(&app, "I'm on CPT and start my internship in 3 weeks").await;
    let id = body["session"]["session_id"].as_str().unwrap().to_string();

    let (status, error) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/events"),
        Some(json!({"event_type": "teleport", "payload": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "UNSUPPORTED_EVENT");

    // The rejected event must not reach the journal
    let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(session["events"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn field_update_flows_through_scores() {
    let app = app();
    let body = create_session(&app, "My employer filed my H-1B and my OPT ends before October").await;
    let id = body["session"]["session_id"].as_str().unwrap().to_string();
    assert_eq!(body["session"]["selected_flow_id"], "cap_gap_transition_prep");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/events"),
        Some(json!({
            "event_type": "field_update",
            "payload": {"field": "work_end_date", "value": "2026-09-30"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, updated) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/events"),
        Some(json!({
            "event_type": "field_update",
            "payload": {"field": "petition_status", "value": "approved"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["session"]["fields"]["petition_status"], "approved");
    assert_eq!(updated["session"]["fields"]["work_end_date"], "2026-09-30");
    assert_eq!(updated["session"]["events"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn micro_check_answers_are_graded_and_persisted() {
    let app = app();
    let body = create_session(&app, "I'm on CPT and start my internship in 3 weeks").await;
    let id = body["session"]["session_id"].as_str().unwrap().to_string();

    let (status, checks) = send(
        &app,
        Method::GET,
        &format!("/api/v1/sessions/{id}/micro-checks"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(checks
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["check_id"] == "cpt_start_rule"));
    // Views never leak the answer key
    assert!(checks.as_array().unwrap().iter().all(|c| c.get("correct_option").is_none()));

    let (status, answer) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/micro-checks"),
        Some(json!({
            "check_id": "cpt_start_rule",
            "selected_option": "After the CPT-endorsed I-20 is issued"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answer["result"]["is_correct"], true);

    let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(
        session["micro_checks"]["cpt_start_rule"]["is_correct"],
        true
    );
}

#[tokio::test]
async fn packet_generation_is_stable_between_events() {
    let app = app();
    let body = create_session(&app, "I'm on CPT and start my internship in 3 weeks").await;
    let id = body["session"]["session_id"].as_str().unwrap().to_string();

    let (status, first) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/packet"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let markdown = first["packet_markdown"].as_str().unwrap();
    assert!(markdown.contains("# VisaFlow Advisor Packet"));
    assert!(markdown.contains("not legal advice"));

    let (_, second) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/packet"),
        None,
    )
    .await;
    assert_eq!(first["packet_markdown"], second["packet_markdown"]);
}
