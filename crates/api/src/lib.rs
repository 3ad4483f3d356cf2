//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the wallet-ledger and ride-settlement engine
//! - Bearer-token authentication middleware
//! - The JSON response envelope

pub mod middleware;
pub mod respond;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use farebox_shared::PlatformNotifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Outbound ride-platform notifier.
    pub notifier: Arc<PlatformNotifier>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
