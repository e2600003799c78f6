//! Aggregate health.
//!
//! # Responsibilities
//! - Probe the config, chatbot, tts and email collaborators
//! - Substitute a fixed marker for any collaborator that faults
//! - Fold the results into one document
//!
//! # Design Decisions
//! - Each probe yields its own tagged result; one fault never touches
//!   another component's entry
//! - The outer status reports the gateway's liveness only and is always "ok"
//! - The logs collaborator is not probed

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::collaborator::{Collaborator, Collaborators};
use crate::observability::metrics;
use crate::routing::RouteGroup;

/// Outcome of probing one collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentHealth {
    /// The JSON body the collaborator's health function returned, or null
    /// when the body was not declared as JSON.
    Reported(Value),
    /// The health function faulted.
    Unavailable,
}

impl ComponentHealth {
    pub fn is_reported(&self) -> bool {
        matches!(self, ComponentHealth::Reported(_))
    }
}

impl Serialize for ComponentHealth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ComponentHealth::Reported(value) => value.serialize(serializer),
            ComponentHealth::Unavailable => json!({ "status": "unavailable" }).serialize(serializer),
        }
    }
}

// Field order is alphabetical: the document is emitted with sorted keys.

/// Per-component entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Components {
    pub chatbot: ComponentHealth,
    pub config: ComponentHealth,
    pub email: ComponentHealth,
    pub tts: ComponentHealth,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateHealth {
    pub components: Components,
    pub status: &'static str,
}

/// Probe a single collaborator.
pub async fn probe(group: RouteGroup, collaborator: &dyn Collaborator) -> ComponentHealth {
    // A body that does not declare JSON is reported as null; one that
    // declares JSON but fails to decode is a fault.
    let outcome = match collaborator.health().await {
        Ok(response) if !response.is_json() => Ok(Value::Null),
        Ok(response) => response.json_body(),
        Err(e) => Err(e),
    };

    let health = match outcome {
        Ok(value) => ComponentHealth::Reported(value),
        Err(e) => {
            tracing::warn!(component = %group, error = %e, "Health probe failed");
            ComponentHealth::Unavailable
        }
    };

    metrics::record_component_health(group, health.is_reported());
    health
}

/// Probe every aggregated collaborator concurrently.
pub async fn aggregate(collaborators: &Collaborators) -> AggregateHealth {
    let (config, chatbot, tts, email) = tokio::join!(
        probe(RouteGroup::Config, collaborators.config.as_ref()),
        probe(RouteGroup::Chatbot, collaborators.chatbot.as_ref()),
        probe(RouteGroup::Tts, collaborators.tts.as_ref()),
        probe(RouteGroup::Email, collaborators.email.as_ref()),
    );

    AggregateHealth {
        components: Components {
            chatbot,
            config,
            email,
            tts,
        },
        status: "ok",
    }
}
