//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single fallback dispatcher
//! - Wire up middleware (access log, request ID, tracing)
//! - Short-circuit static assets and upgrade requests
//! - Hand everything else to the request pipeline
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, State, WebSocketUpgrade},
    http::Request,
    middleware,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::assets::AssetServer;
use crate::http::pipeline::Pipeline;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::access_log::access_log;
use crate::observability::client_ip;
use crate::routing::RouteTable;
use crate::upgrade::UpgradeDispatcher;

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub assets: Arc<AssetServer>,
    pub upgrade: Option<UpgradeDispatcher>,
}

/// HTTP server fronting the route table.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    routes: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a new HTTP server. `upgrade` enables websocket handling.
    pub fn new(config: ServerConfig, routes: RouteTable, upgrade: Option<UpgradeDispatcher>) -> Self {
        let routes = Arc::new(routes);
        let state = AppState {
            pipeline: Pipeline::new(Arc::clone(&routes), config.limits.max_body_bytes),
            assets: Arc::new(AssetServer::new(&config.paths)),
            upgrade,
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            routes,
        }
    }

    /// Build the Axum router with all middleware layers. The last layer is outermost.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(middleware::from_fn(access_log))
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Log every registered route, sorted by pattern.
    pub fn log_routes(&self) {
        tracing::info!(
            count = self.routes.len(),
            routes_dir = %self.config.paths.routes_dir,
            "Route table loaded"
        );
        for (pattern, file) in self.routes.listing() {
            tracing::info!("Route: {}, File: {}", pattern, file);
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            development = self.config.environment.development,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Fallback handler for every request.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    // 1. Upgrade
    let request = match &state.upgrade {
        Some(upgrade) if UpgradeDispatcher::is_upgrade_request(request.headers()) => {
            match try_upgrade(upgrade, &state, request).await {
                Ok(response) => return response,
                Err(request) => request,
            }
        }
        _ => request,
    };

    // 2. Static assets
    let path = request.uri().path();
    if state.assets.handles(path) {
        let path = path.to_string();
        return state.assets.serve(request.method(), &path).await;
    }

    // 3. Routes
    state.pipeline.handle(request).await
}

/// Complete the websocket handshake, or hand the request back when it is not a valid one.
async fn try_upgrade(
    upgrade: &UpgradeDispatcher,
    state: &AppState,
    request: Request<Body>,
) -> Result<Response, Request<Body>> {
    let (mut parts, body) = request.into_parts();
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let ip = client_ip::resolve(peer, &parts.headers);
    let path = parts.uri.path().to_string();

    match WebSocketUpgrade::from_request_parts(&mut parts, state).await {
        Ok(ws) => Ok(upgrade.accept(ws, ip, path)),
        Err(rejection) => {
            tracing::debug!(path = %path, error = %rejection, "Not a valid upgrade, dispatching as HTTP");
            Err(Request::from_parts(parts, body))
        }
    }
}
