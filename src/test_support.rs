//! In-memory collaborators for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use serde_json::{json, Value};

use crate::collaborator::{
    ChatEngine, Collaborator, CollaboratorError, CollaboratorRequest, CollaboratorResponse,
    Collaborators,
};

fn fault(message: &str) -> CollaboratorError {
    CollaboratorError::Upstream {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

/// Echoes every call and reports a fixed health body.
pub struct FakeCollaborator {
    name: &'static str,
    /// `None` makes the health function fault.
    health: Option<CollaboratorResponse>,
    fail_calls: bool,
    pub calls: AtomicUsize,
    pub health_calls: AtomicUsize,
    pub last_request: Mutex<Option<CollaboratorRequest>>,
}

impl FakeCollaborator {
    fn build(name: &'static str, health: Option<CollaboratorResponse>, fail_calls: bool) -> Self {
        Self {
            name,
            health,
            fail_calls,
            calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn new(name: &'static str) -> Arc<Self> {
        let body = json!({ "status": "ok", "component": name });
        let health = CollaboratorResponse::json(StatusCode::OK, &body);
        Arc::new(Self::build(name, Some(health), false))
    }

    pub fn failing_health() -> Arc<dyn Collaborator> {
        Arc::new(Self::build("failing", None, false))
    }

    pub fn failing_calls(name: &'static str) -> Arc<Self> {
        Arc::new(Self::build(name, None, true))
    }

    /// Health body served as `application/json`, whatever it contains.
    pub fn with_health_body(body: &'static str) -> Arc<Self> {
        Self::with_health_response(body, "application/json")
    }

    pub fn with_plain_health_body(body: &'static str) -> Arc<Self> {
        Self::with_health_response(body, "text/plain")
    }

    fn with_health_response(body: &'static str, content_type: &'static str) -> Arc<Self> {
        let mut health = CollaboratorResponse::json(StatusCode::OK, &Value::Null);
        health
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        health.body = Bytes::from_static(body.as_bytes());
        Arc::new(Self::build("custom", Some(health), false))
    }

    /// A healthy fake for every group.
    pub fn set(chat: Arc<FakeChat>) -> Collaborators {
        Collaborators {
            config: Self::new("config"),
            chatbot: Self::new("chatbot"),
            tts: Self::new("tts"),
            logs: Self::new("logs"),
            email: Self::new("email"),
            chat_engine: chat,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Collaborator for FakeCollaborator {
    async fn call(
        &self,
        request: CollaboratorRequest,
    ) -> Result<CollaboratorResponse, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls {
            return Err(fault("collaborator crashed"));
        }

        let body = json!({
            "component": self.name,
            "method": request.method.as_str(),
            "path": request.path,
            "query": request.query,
            "body": String::from_utf8_lossy(&request.body),
        });
        *self.last_request.lock().unwrap() = Some(request);

        let mut response = CollaboratorResponse::json(StatusCode::ACCEPTED, &body);
        response
            .headers
            .insert("x-collaborator", HeaderValue::from_static(self.name));
        Ok(response)
    }

    async fn health(&self) -> Result<CollaboratorResponse, CollaboratorError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        match &self.health {
            Some(response) => Ok(response.clone()),
            None => Err(fault("health check exploded")),
        }
    }
}

/// Chat engine returning a canned reply or fault.
pub struct FakeChat {
    reply: Result<Value, String>,
    pub calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

impl FakeChat {
    pub fn replying(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatEngine for FakeChat {
    async fn run_chatbot(&self, prompt: &str) -> Result<Value, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.reply.clone().map_err(|message| fault(&message))
    }
}
