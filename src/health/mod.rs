//! Health subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → aggregate.rs
//!     → probe config, chatbot, tts, email in parallel
//!     → ComponentHealth per collaborator (Reported | Unavailable)
//!     → {"status": "ok", "components": {...}}
//! ```
//!
//! Per-group `/<group>/health` routes bypass this module and delegate
//! straight to the collaborator (see `http::handlers`).

pub mod aggregate;

pub use aggregate::{aggregate, probe, AggregateHealth, ComponentHealth, Components};
