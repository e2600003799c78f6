//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Fold the static route table into an Axum Router
//! - Wire up middleware (tracing, request ID, CORS, body limit)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::io;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    handler::Handler,
    http::{header, HeaderValue},
    middleware::map_response,
    response::Response,
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::collaborator::Collaborators;
use crate::config::GatewayConfig;
use crate::http::handlers::{self, AppState};
use crate::observability::metrics;
use crate::routing::table::AGGREGATE_HEALTH_PATH;
use crate::routing::{DuplicateRoute, RouteEntry, RouteMethod, RoutingTable};

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    table: RoutingTable,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server forwarding to the configured upstreams.
    pub fn new(config: GatewayConfig) -> Result<Self, DuplicateRoute> {
        let collaborators = Collaborators::upstream(&config);
        Self::with_collaborators(config, collaborators)
    }

    /// Create a server over an explicit collaborator set.
    pub fn with_collaborators(
        config: GatewayConfig,
        collaborators: Collaborators,
    ) -> Result<Self, DuplicateRoute> {
        let table = RoutingTable::standard()?;
        let state = AppState {
            collaborators,
            max_body_size: config.limits.max_body_size,
        };
        let router = build_router(&table, state, config.limits.max_body_size);

        Ok(Self {
            router,
            table,
            config,
        })
    }

    /// A clone of the assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.entries().len() + 1,
            "Gateway listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(table: &RoutingTable, state: AppState, max_body_size: usize) -> Router {
    let mut router = Router::new().route(
        AGGREGATE_HEALTH_PATH,
        get(handlers::aggregate_health).layer(cors()),
    );

    for entry in table.entries() {
        tracing::debug!(
            path = %entry.full_path(),
            methods = ?entry.methods,
            dispatch = ?entry.dispatch,
            "Registering route"
        );
        router = router.route(&entry.full_path(), method_router(entry));
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn method_router(entry: &'static RouteEntry) -> MethodRouter<AppState> {
    let handler = move |State(state): State<AppState>, request: Request| async move {
        let start = Instant::now();
        let response = handlers::dispatch(state, entry, request).await;
        metrics::record_request(entry.group.as_str(), response.status(), start);
        response
    };

    if !entry.delegates_options() {
        return entry
            .methods
            .iter()
            .fold(MethodRouter::new(), |router, method| {
                router.on(method.filter(), handler)
            })
            .layer(cors());
    }

    // A CorsLayer answers every OPTIONS itself, so it only wraps the other
    // methods here and delegated OPTIONS responses get the headers afterwards.
    entry
        .methods
        .iter()
        .fold(MethodRouter::new(), |router, method| match method {
            RouteMethod::Options => {
                router.on(method.filter(), handler.layer(map_response(allow_any_origin)))
            }
            _ => router.on(method.filter(), handler.layer(cors())),
        })
}

/// Permissive CORS headers for a response the collaborator produced.
async fn allow_any_origin(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for name in [
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header::ACCESS_CONTROL_ALLOW_METHODS,
        header::ACCESS_CONTROL_ALLOW_HEADERS,
    ] {
        headers
            .entry(name)
            .or_insert(HeaderValue::from_static("*"));
    }
    response
}

/// Any origin, any method, any header.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
