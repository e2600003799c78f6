//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     table.rs ROUTES
//!     → RoutingTable::new (collision check)
//!     → http::server folds entries into the axum Router
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path)
//!     → axum Router match
//!     → Dispatch kind decides handler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Each (method, full path) maps to exactly one entry
//! - One route group per collaborator, one URL prefix per group

pub mod table;

use std::fmt;

use serde::Serialize;

pub use table::{Dispatch, DuplicateRoute, RouteEntry, RouteMethod, RoutingTable, ROUTES};

/// A set of endpoints sharing a URL prefix and a single collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteGroup {
    Config,
    Chatbot,
    Tts,
    Logs,
    Email,
}

impl RouteGroup {
    pub const ALL: [RouteGroup; 5] = [
        RouteGroup::Config,
        RouteGroup::Chatbot,
        RouteGroup::Tts,
        RouteGroup::Logs,
        RouteGroup::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteGroup::Config => "config",
            RouteGroup::Chatbot => "chatbot",
            RouteGroup::Tts => "tts",
            RouteGroup::Logs => "logs",
            RouteGroup::Email => "email",
        }
    }

    /// URL prefix under which the group is mounted.
    pub fn prefix(self) -> &'static str {
        match self {
            RouteGroup::Config => "/config",
            RouteGroup::Chatbot => "/chatbot",
            RouteGroup::Tts => "/tts",
            RouteGroup::Logs => "/logs",
            RouteGroup::Email => "/email",
        }
    }

    /// Whether the group's health function is ever called. Logs has no
    /// health route and is left out of the aggregate.
    pub fn has_health(self) -> bool {
        !matches!(self, RouteGroup::Logs)
    }
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
