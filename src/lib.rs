// Photo Store - upload, list and delete photos kept on the local filesystem

pub mod config;
pub mod models;
pub mod types;
pub mod storage;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::{AppState, StoredFile};
pub use storage::PhotoStore;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
