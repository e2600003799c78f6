//! Unhandled faults.
//!
//! A collaborator fault on a plain delegating route is not substituted:
//! the client sees the same opaque 500 it would get from any unhandled error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::collaborator::CollaboratorError;
use crate::routing::RouteGroup;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{group} collaborator failed: {source}")]
    Collaborator {
        group: RouteGroup,
        source: CollaboratorError,
    },

    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Collaborator { .. } => {
                tracing::error!(error = %self, "Unhandled collaborator fault");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            GatewayError::Body(ref e) => {
                tracing::warn!(error = %e, "Rejected request body");
                (StatusCode::BAD_REQUEST, "Bad Request").into_response()
            }
        }
    }
}
