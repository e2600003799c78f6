//! Request handlers.
//!
//! # Responsibilities
//! - Delegate matched routes to their collaborator
//! - Validate `/chatbot/run` input before running the chat engine
//! - Isolate faults where the gateway contract requires it
//!
//! # Fault Isolation
//! ```text
//! /chatbot/run     → {"error": <fault>}, 500
//! /email/health    → {"status": "unknown"}, 500
//! /health          → per-component {"status": "unavailable"}, 200
//! everything else  → opaque 500 (GatewayError)
//! ```

use std::time::Instant;

use axum::{
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::collaborator::{CollaboratorError, CollaboratorRequest, CollaboratorResponse, Collaborators};
use crate::health;
use crate::http::error::GatewayError;
use crate::observability::metrics;
use crate::routing::{Dispatch, RouteEntry, RouteGroup};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub collaborators: Collaborators,
    pub max_body_size: usize,
}

/// Run the handler selected by a route entry.
pub async fn dispatch(state: AppState, entry: &'static RouteEntry, request: Request) -> Response {
    match entry.dispatch {
        Dispatch::Forward => forward(&state, entry, request).await.into_response(),
        Dispatch::Health => group_health(&state, entry.group).await.into_response(),
        Dispatch::ChatRun => run_chat(&state, request).await,
        Dispatch::EmailHealth => email_health(&state).await,
    }
}

fn unhandled(group: RouteGroup, operation: &'static str, source: CollaboratorError) -> GatewayError {
    metrics::record_collaborator_fault(group, operation);
    GatewayError::Collaborator { group, source }
}

async fn forward(
    state: &AppState,
    entry: &RouteEntry,
    request: Request,
) -> Result<CollaboratorResponse, GatewayError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.max_body_size).await?;

    let call = CollaboratorRequest {
        method: parts.method,
        path: entry.suffix.to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };

    state
        .collaborators
        .get(entry.group)
        .call(call)
        .await
        .map_err(|source| unhandled(entry.group, "call", source))
}

async fn group_health(
    state: &AppState,
    group: RouteGroup,
) -> Result<CollaboratorResponse, GatewayError> {
    state
        .collaborators
        .get(group)
        .health()
        .await
        .map_err(|source| unhandled(group, "health", source))
}

/// `message` wins over `prompt`; empty or non-string values count as absent.
pub fn extract_prompt(payload: Option<&Value>) -> Option<&str> {
    text_field(payload, "message").or_else(|| text_field(payload, "prompt"))
}

fn text_field<'a>(payload: Option<&'a Value>, key: &str) -> Option<&'a str> {
    payload
        .and_then(|body| body.get(key))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

async fn run_chat(state: &AppState, request: Request) -> Response {
    // Missing, mistyped or malformed bodies are treated as `{}`.
    let payload = Json::<Value>::from_request(request, &())
        .await
        .ok()
        .map(|Json(value)| value);

    let Some(prompt) = extract_prompt(payload.as_ref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "no message provided" })),
        )
            .into_response();
    };

    match state.collaborators.chat_engine.run_chatbot(prompt).await {
        Ok(reply) => Json(json!({ "reply": reply })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Chat run failed");
            metrics::record_collaborator_fault(RouteGroup::Chatbot, "run");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn email_health(state: &AppState) -> Response {
    match state.collaborators.email.health().await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Email health check failed");
            metrics::record_collaborator_fault(RouteGroup::Email, "health");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unknown" })),
            )
                .into_response()
        }
    }
}

/// `GET /health`: aggregate of the collaborators' own health checks.
pub async fn aggregate_health(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let response = Json(health::aggregate(&state.collaborators).await).into_response();
    metrics::record_request(metrics::GATEWAY_LABEL, response.status(), start);
    response
}
