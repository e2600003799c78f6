//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RouteGroup;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream collaborator services, one per route group.
    pub upstreams: UpstreamsConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (wildcard by default).
    pub host: String,

    /// Bind port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Upstream addresses for every collaborator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub config: UpstreamConfig,
    pub chatbot: ChatUpstreamConfig,
    pub tts: UpstreamConfig,
    /// Logs is never probed, so its `health_path` is ignored.
    pub logs: UpstreamConfig,
    pub email: UpstreamConfig,
}

impl UpstreamsConfig {
    /// Upstream settings for a route group.
    pub fn get(&self, group: RouteGroup) -> &UpstreamConfig {
        match group {
            RouteGroup::Config => &self.config,
            RouteGroup::Chatbot => &self.chatbot.upstream,
            RouteGroup::Tts => &self.tts,
            RouteGroup::Logs => &self.logs,
            RouteGroup::Email => &self.email,
        }
    }
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            config: UpstreamConfig::at("127.0.0.1:9001"),
            chatbot: ChatUpstreamConfig::default(),
            tts: UpstreamConfig::at("127.0.0.1:9003"),
            logs: UpstreamConfig::at("127.0.0.1:9004"),
            email: UpstreamConfig::at("127.0.0.1:9005"),
        }
    }
}

/// A single upstream collaborator service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:9001").
    pub address: String,

    /// Path probed by the health check.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl UpstreamConfig {
    pub fn at(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            health_path: default_health_path(),
        }
    }
}

fn default_health_path() -> String {
    "/health".to_string()
}

/// Chatbot upstream, which additionally serves prompt runs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatUpstreamConfig {
    #[serde(flatten)]
    pub upstream: UpstreamConfig,

    /// Path receiving `{"message": ...}` for `/chatbot/run`.
    #[serde(default = "default_run_path")]
    pub run_path: String,
}

impl Default for ChatUpstreamConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::at("127.0.0.1:9002"),
            run_path: default_run_path(),
        }
    }
}

fn default_run_path() -> String {
    "/api/chat".to_string()
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request and buffered upstream response body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
