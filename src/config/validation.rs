//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::RouteGroup;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener host {0:?} is not an IP address")]
    InvalidHost(String),

    #[error("upstream {group} address {address:?} is not host:port")]
    InvalidUpstreamAddress { group: RouteGroup, address: String },

    #[error("{field} {path:?} must start with '/'")]
    InvalidPath { field: String, path: String },

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidHost(config.listener.host.clone()));
    }

    for group in RouteGroup::ALL {
        let upstream = config.upstreams.get(group);
        if !is_host_port(&upstream.address) {
            errors.push(ValidationError::InvalidUpstreamAddress {
                group,
                address: upstream.address.clone(),
            });
        }
        if group.has_health() {
            check_path(
                &mut errors,
                format!("upstreams.{}.health_path", group),
                &upstream.health_path,
            );
        }
    }
    check_path(
        &mut errors,
        "upstreams.chatbot.run_path".to_string(),
        &config.upstreams.chatbot.run_path,
    );

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: String, path: &str) {
    if !path.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field,
            path: path.to_string(),
        });
    }
}

/// Upstreams may be DNS names, so only the `host:port` shape is checked.
fn is_host_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && !host.contains('/') && port.parse::<u16>().is_ok(),
        None => false,
    }
}
