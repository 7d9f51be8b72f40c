//! MergeGate review web server and REST API.
//!
//! Provides an Axum-based HTTP server with:
//! - Health and configuration endpoints
//! - The pending-resolution review API (list, add, approve, reject, save)
//!
//! The same surface serves two clients: the local review UI in a browser,
//! and delegating peer instances forwarding their store operations. Every
//! response carries `Cache-Control: no-store` so a reviewer always decides
//! against live state, and CORS only admits localhost origins.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use mergegate_core::store::ResolutionStore;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: Arc<dyn ResolutionStore>,
    pub review_mode: bool,
}

/// The review web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server over the given store.
    pub fn new(store: Arc<dyn ResolutionStore>, review_mode: bool) -> Self {
        let state = Arc::new(AppState { store, review_mode });
        Self { state }
    }

    /// Build the router with all API routes and middleware.
    pub fn router(&self) -> Router {
        let no_store = SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(|origin, _| is_local_origin(origin)))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .merge(api::status::routes())
            .merge(api::resolutions::routes())
            .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2 MB max request body
            .layer(no_store)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the web server, listening on the given address.
    pub async fn start(self, listen_addr: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = listen_addr.parse()?;
        let app = self.router();

        info!(addr = %addr, "starting review web server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// The review surface is a local tool; only browser origins on this host
/// may call it cross-origin.
fn is_local_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    let host = match rest.strip_prefix('[') {
        // Bracketed IPv6 literal, e.g. http://[::1]:5173
        Some(v6) => match v6.split(']').next() {
            Some(host) => format!("[{host}]"),
            None => return false,
        },
        None => rest.split(':').next().unwrap_or(rest).to_string(),
    };

    matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]")
}
