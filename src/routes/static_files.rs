//! Static File Serving
//!
//! Serves the landing page and assets from the public directory, and the
//! stored photos themselves under the store's URL prefix so every public URL
//! resolves to its bytes.

use axum::{
    Router,
    routing::get,
    response::{IntoResponse, Response},
    http::{StatusCode, header},
};
use crate::storage::PhotoStore;
use tower_http::services::ServeDir;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Create router for the landing page, public assets and stored photos
pub fn router(public_dir: &Path, store: &PhotoStore) -> Router {
    if !public_dir.is_dir() {
        warn!(path = %public_dir.display(), "Public directory not found, serving built-in landing page");
    }

    let index_path = public_dir.join("index.html");
    let uploads = ServeDir::new(store.root());
    let public = ServeDir::new(public_dir);

    let router = Router::new().route("/", get(move || serve_index(index_path.clone())));

    match mount_point(store.url_prefix()) {
        Some(mount) => {
            info!(mount = %mount, path = %store.root().display(), "Serving uploads");
            router
                .nest_service(&mount, uploads)
                .fallback_service(public)
        }
        // Uploads share the site root with the public assets.
        None => {
            info!(path = %store.root().display(), "Serving uploads at site root");
            router.fallback_service(public.fallback(uploads))
        }
    }
}

/// `"/uploads/"` mounts at `"/uploads"`; the bare root has no mount point.
fn mount_point(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Serve the index page
async fn serve_index(index_path: PathBuf) -> Response {
    if let Ok(content) = tokio::fs::read_to_string(&index_path).await {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            content,
        )
            .into_response();
    }

    let fallback_html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Photo Store</title>
</head>
<body>
    <h1>Photo Store</h1>
    <p>The server is running. Add a <code>public/index.html</code> to replace this page.</p>
    <ul>
        <li><code>POST /upload</code> - multipart upload, field <code>photo</code></li>
        <li><code>GET /photos</code> - list stored photos</li>
        <li><code>DELETE /photos/{filename}</code> - delete a photo</li>
    </ul>
</body>
</html>"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        fallback_html,
    )
        .into_response()
}
