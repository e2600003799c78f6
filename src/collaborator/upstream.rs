//! HTTP collaborators backed by upstream services.
//!
//! # Responsibilities
//! - Forward delegated requests to the group's upstream address
//! - Probe the upstream health path
//! - Run chat prompts against the chatbot upstream
//!
//! # Design Decisions
//! - One pooled hyper client shared by every upstream
//! - Bodies are buffered up to the configured limit
//! - Hop-by-hop headers never cross the gateway
//! - No deadline is imposed on upstream calls

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::{json, Value};

use super::{ChatEngine, Collaborator, CollaboratorError, CollaboratorRequest, CollaboratorResponse};
use crate::http::headers::strip_hop_by_hop;
use crate::routing::RouteGroup;

/// Sends requests to a single upstream address.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    pool: Client<HttpConnector, Body>,
    address: String,
    max_body_size: usize,
}

impl UpstreamClient {
    /// A fresh connection pool.
    pub fn pool() -> Client<HttpConnector, Body> {
        Client::builder(TokioExecutor::new()).build(HttpConnector::new())
    }

    pub fn new(pool: Client<HttpConnector, Body>, address: &str, max_body_size: usize) -> Self {
        Self {
            pool,
            address: address.to_string(),
            max_body_size,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send one request and buffer the response.
    pub async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<CollaboratorResponse, CollaboratorError> {
        let uri: Uri = format!("http://{}{}", self.address, path_and_query)
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| CollaboratorError::InvalidRequest(e.to_string()))?;

        let mut forwarded = headers.clone();
        strip_hop_by_hop(&mut forwarded);
        forwarded.remove(header::HOST);
        forwarded.remove(header::CONTENT_LENGTH);

        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(target) = builder.headers_mut() {
            *target = forwarded;
        }
        let request = builder
            .body(Body::from(body))
            .map_err(|e| CollaboratorError::InvalidRequest(e.to_string()))?;

        let response = self
            .pool
            .request(request)
            .await
            .map_err(|e| CollaboratorError::Connect(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(Body::new(body), self.max_body_size)
            .await
            .map_err(|e| CollaboratorError::Body(e.to_string()))?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);

        Ok(CollaboratorResponse {
            status: parts.status,
            headers,
            body,
        })
    }
}

/// Forwards a route group's traffic to its upstream service.
#[derive(Debug, Clone)]
pub struct UpstreamCollaborator {
    group: RouteGroup,
    client: UpstreamClient,
    health_path: String,
}

impl UpstreamCollaborator {
    pub fn new(group: RouteGroup, client: UpstreamClient, health_path: &str) -> Self {
        Self {
            group,
            client,
            health_path: health_path.to_string(),
        }
    }
}

#[async_trait]
impl Collaborator for UpstreamCollaborator {
    async fn call(
        &self,
        request: CollaboratorRequest,
    ) -> Result<CollaboratorResponse, CollaboratorError> {
        tracing::debug!(
            group = %self.group,
            upstream = %self.client.address(),
            method = %request.method,
            path = %request.path,
            "Forwarding to collaborator"
        );
        self.client
            .send(
                request.method.clone(),
                &request.path_and_query(),
                &request.headers,
                request.body,
            )
            .await
    }

    async fn health(&self) -> Result<CollaboratorResponse, CollaboratorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("unified-gateway-health-check"),
        );
        self.client
            .send(Method::GET, &self.health_path, &headers, Bytes::new())
            .await
    }
}

/// Runs prompts against the chatbot upstream.
#[derive(Debug, Clone)]
pub struct UpstreamChatEngine {
    client: UpstreamClient,
    run_path: String,
}

impl UpstreamChatEngine {
    pub fn new(client: UpstreamClient, run_path: &str) -> Self {
        Self {
            client,
            run_path: run_path.to_string(),
        }
    }
}

#[async_trait]
impl ChatEngine for UpstreamChatEngine {
    async fn run_chatbot(&self, prompt: &str) -> Result<Value, CollaboratorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let body = Bytes::from(json!({ "message": prompt }).to_string());

        let response = self
            .client
            .send(Method::POST, &self.run_path, &headers, body)
            .await?;

        chat_reply(response)
    }
}

/// Pull the reply out of a chat upstream response.
fn chat_reply(response: CollaboratorResponse) -> Result<Value, CollaboratorError> {
    if !response.status.is_success() {
        let message = response
            .json_body()
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("upstream returned {}", response.status));
        return Err(CollaboratorError::Upstream {
            status: response.status,
            message,
        });
    }

    let mut body = response.json_body()?;
    Ok(match body.get_mut("reply") {
        Some(reply) => reply.take(),
        None => body,
    })
}
