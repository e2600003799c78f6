//! Unified API gateway library.
//!
//! Exposes the five backend components (config, chatbot, tts, logs, email)
//! behind a single HTTP endpoint under fixed path prefixes, plus an aggregate
//! health document at `/health`.

pub mod collaborator;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

#[cfg(test)]
mod test_support;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
