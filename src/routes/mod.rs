//! HTTP Routes
//!
//! - `POST /upload`, `GET /photos`, `DELETE /photos/{filename}` - photo lifecycle
//! - `GET /health` - liveness and storage check
//! - `/` and everything else - landing page, public assets, stored photos

pub mod health;
pub mod photos;
pub mod static_files;

use axum::Router;
use crate::middleware::apply_cors;
use crate::models::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
///
/// API routes take precedence over static files.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(photos::router(state.clone()))
        .merge(health::router(state.clone()));

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(&state.config.storage.public_dir, &state.store));

    apply_cors(router, &state.config.server.cors_allowed_origins).layer(TraceLayer::new_for_http())
}
