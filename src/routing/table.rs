//! The static route table.
//!
//! # Responsibilities
//! - Declare every (method, path) served by the gateway
//! - Bind each route to its group and dispatch kind
//! - Reject duplicate (method, full path) registrations
//!
//! # Design Decisions
//! - Table is a `static` slice, folded into the axum router at startup
//! - No runtime mutation path

use std::collections::HashSet;

use axum::routing::MethodFilter;
use thiserror::Error;

use super::RouteGroup;

/// HTTP methods used by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Options,
}

impl RouteMethod {
    pub fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Options => MethodFilter::OPTIONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Options => "OPTIONS",
        }
    }
}

/// What the gateway does with a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Hand the request to the group's collaborator unchanged.
    Forward,
    /// Call the group's health function; faults are not isolated.
    Health,
    /// Validate the prompt, then run the chat engine.
    ChatRun,
    /// Email health, answering `{"status": "unknown"}` on fault.
    EmailHealth,
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub group: RouteGroup,
    pub suffix: &'static str,
    pub methods: &'static [RouteMethod],
    pub dispatch: Dispatch,
}

impl RouteEntry {
    const fn new(
        group: RouteGroup,
        methods: &'static [RouteMethod],
        suffix: &'static str,
        dispatch: Dispatch,
    ) -> Self {
        Self {
            group,
            suffix,
            methods,
            dispatch,
        }
    }

    /// Prefix plus suffix, e.g. `/email/service/status`.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.group.prefix(), self.suffix)
    }

    /// Whether OPTIONS is handed to the collaborator rather than answered
    /// as a CORS preflight.
    pub fn delegates_options(&self) -> bool {
        self.dispatch == Dispatch::Forward && self.methods.contains(&RouteMethod::Options)
    }
}

use Dispatch::{ChatRun, EmailHealth, Forward, Health};
use RouteGroup::{Chatbot, Config, Email, Logs, Tts};

const GET: &[RouteMethod] = &[RouteMethod::Get];
const POST: &[RouteMethod] = &[RouteMethod::Post];
const POST_OPTIONS: &[RouteMethod] = &[RouteMethod::Post, RouteMethod::Options];

/// Every route the gateway serves, except the aggregate `/health`.
pub static ROUTES: &[RouteEntry] = &[
    // config
    RouteEntry::new(Config, GET, "/read", Forward),
    RouteEntry::new(Config, POST, "/write", Forward),
    RouteEntry::new(Config, POST, "/clear", Forward),
    RouteEntry::new(Config, GET, "/health", Health),
    // chatbot
    RouteEntry::new(Chatbot, POST_OPTIONS, "/api/chat", Forward),
    RouteEntry::new(Chatbot, POST, "/run", ChatRun),
    RouteEntry::new(Chatbot, GET, "/health", Health),
    // tts
    RouteEntry::new(Tts, POST_OPTIONS, "/api/tts", Forward),
    RouteEntry::new(Tts, GET, "/health", Health),
    // logs
    RouteEntry::new(Logs, GET, "/api/logs", Forward),
    RouteEntry::new(Logs, GET, "/api/regenerate_logs", Forward),
    // email
    RouteEntry::new(Email, GET, "/service/status", Forward),
    RouteEntry::new(Email, POST, "/service/enable", Forward),
    RouteEntry::new(Email, POST, "/service/disable", Forward),
    RouteEntry::new(Email, POST, "/service/send-now", Forward),
    RouteEntry::new(Email, POST, "/service/send-test", Forward),
    RouteEntry::new(Email, GET, "/health", EmailHealth),
];

/// Path of the aggregate health route.
pub const AGGREGATE_HEALTH_PATH: &str = "/health";

/// Raised when two entries claim the same (method, full path).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate route {method} {path}")]
pub struct DuplicateRoute {
    pub method: &'static str,
    pub path: String,
}

/// A checked, immutable set of route entries.
#[derive(Debug, Clone, Copy)]
pub struct RoutingTable {
    entries: &'static [RouteEntry],
}

impl RoutingTable {
    /// Check the entries for collisions.
    pub fn new(entries: &'static [RouteEntry]) -> Result<Self, DuplicateRoute> {
        let mut seen = HashSet::new();
        seen.insert((RouteMethod::Get, AGGREGATE_HEALTH_PATH.to_string()));

        for entry in entries {
            let path = entry.full_path();
            for method in entry.methods {
                if !seen.insert((*method, path.clone())) {
                    return Err(DuplicateRoute {
                        method: method.as_str(),
                        path,
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    /// The table served by the gateway binary.
    pub fn standard() -> Result<Self, DuplicateRoute> {
        Self::new(ROUTES)
    }

    pub fn entries(&self) -> &'static [RouteEntry] {
        self.entries
    }

    /// Find the entry serving `method` on `path`.
    pub fn lookup(&self, method: RouteMethod, path: &str) -> Option<&'static RouteEntry> {
        self.entries.iter().find(|entry| {
            entry.methods.contains(&method)
                && path
                    .strip_prefix(entry.group.prefix())
                    .is_some_and(|rest| rest == entry.suffix)
        })
    }
}
