//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, CORS, body limit)
//!     → route table match (routing::table)
//!     → handlers.rs (delegate / validate / isolate faults)
//!     → collaborator response returned verbatim
//!     → error.rs (opaque 500 for unhandled collaborator faults)
//! ```

pub mod error;
pub mod handlers;
pub mod headers;
pub mod server;

pub use error::GatewayError;
pub use handlers::AppState;
pub use server::GatewayServer;
