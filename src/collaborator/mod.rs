//! Collaborator subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway handler
//!     → Collaborators (one per route group)
//!     → Collaborator::call / Collaborator::health
//!     → upstream.rs (HTTP forward to the collaborator service)
//!     → CollaboratorResponse (status, headers, body) returned verbatim
//!
//! /chatbot/run
//!     → ChatEngine::run_chatbot(prompt)
//!     → reply value
//! ```
//!
//! # Design Decisions
//! - Collaborators are trait objects so handlers can be tested with fakes
//! - Responses are fully buffered; the gateway never inspects them except
//!   for health aggregation

pub mod upstream;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::routing::RouteGroup;

pub use upstream::{UpstreamChatEngine, UpstreamClient, UpstreamCollaborator};

/// A fault raised while talking to a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("upstream unreachable: {0}")]
    Connect(String),

    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    #[error("failed to read upstream body: {0}")]
    Body(String),

    /// The collaborator answered, but with a failure.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("invalid JSON from upstream: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A request handed to a collaborator.
#[derive(Debug, Clone)]
pub struct CollaboratorRequest {
    pub method: Method,
    /// Path within the route group, e.g. `/service/status`.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CollaboratorRequest {
    /// Path plus query string.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// A collaborator's answer, returned to the client unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct CollaboratorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CollaboratorResponse {
    /// Build a JSON response.
    pub fn json(status: StatusCode, value: &Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Self {
            status,
            headers,
            body: Bytes::from(value.to_string()),
        }
    }

    /// Decode the body as JSON.
    pub fn json_body(&self) -> Result<Value, CollaboratorError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Whether the content type declares JSON (`application/json` or `application/*+json`).
    pub fn is_json(&self) -> bool {
        let Some(content_type) = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    }
}

impl IntoResponse for CollaboratorResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// The contract every collaborator module fulfils.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Handle one delegated route.
    async fn call(&self, request: CollaboratorRequest)
        -> Result<CollaboratorResponse, CollaboratorError>;

    /// Report the collaborator's own health.
    async fn health(&self) -> Result<CollaboratorResponse, CollaboratorError>;
}

/// Runs a single chat prompt.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    async fn run_chatbot(&self, prompt: &str) -> Result<Value, CollaboratorError>;
}

/// The full set of collaborators behind the gateway.
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn Collaborator>,
    pub chatbot: Arc<dyn Collaborator>,
    pub tts: Arc<dyn Collaborator>,
    pub logs: Arc<dyn Collaborator>,
    pub email: Arc<dyn Collaborator>,
    pub chat_engine: Arc<dyn ChatEngine>,
}

impl Collaborators {
    /// Collaborator serving a route group.
    pub fn get(&self, group: RouteGroup) -> &Arc<dyn Collaborator> {
        match group {
            RouteGroup::Config => &self.config,
            RouteGroup::Chatbot => &self.chatbot,
            RouteGroup::Tts => &self.tts,
            RouteGroup::Logs => &self.logs,
            RouteGroup::Email => &self.email,
        }
    }

    /// HTTP collaborators for every upstream in the configuration.
    ///
    /// All of them share one connection pool.
    pub fn upstream(config: &GatewayConfig) -> Self {
        let max_body = config.limits.max_body_size;
        let pool = UpstreamClient::pool();
        let client = |group: RouteGroup| {
            UpstreamClient::new(pool.clone(), &config.upstreams.get(group).address, max_body)
        };
        let collaborator = |group: RouteGroup| -> Arc<dyn Collaborator> {
            Arc::new(UpstreamCollaborator::new(
                group,
                client(group),
                &config.upstreams.get(group).health_path,
            ))
        };

        Self {
            config: collaborator(RouteGroup::Config),
            chatbot: collaborator(RouteGroup::Chatbot),
            tts: collaborator(RouteGroup::Tts),
            logs: collaborator(RouteGroup::Logs),
            email: collaborator(RouteGroup::Email),
            chat_engine: Arc::new(UpstreamChatEngine::new(
                client(RouteGroup::Chatbot),
                &config.upstreams.chatbot.run_path,
            )),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
