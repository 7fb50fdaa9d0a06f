//! Photo endpoints
//!
//! - `POST /upload` - multipart upload, file field `photo`
//! - `GET /photos` - public URLs of every stored photo
//! - `DELETE /photos/{filename}` - remove one stored photo
//!
//! Every failure, including extractor rejections, answers with a JSON `error` body.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, DefaultBodyLimit, Multipart,
        Path, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use crate::models::{AppState, MessageResponse, UploadResponse};
use crate::types::{AppError, AppResult};
use tracing::{debug, info};

/// Multipart field carrying the uploaded photo.
pub const PHOTO_FIELD: &str = "photo";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/upload",
            post(upload_photo).layer(DefaultBodyLimit::disable()),
        )
        .route("/photos", get(list_photos))
        // Catch-all so multi-segment names reach the handler and get rejected as JSON.
        .route(
            "/photos/{*filename}",
            delete(delete_photo).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// POST /upload - stream the `photo` field into the store
async fn upload_photo(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(reason = %rejection, "Upload without a multipart body");
            return Err(AppError::NoContent);
        }
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        // Browsers send an empty filename when no file was picked.
        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        info!(original_name = %original_name, "Photo upload received");
        // Parse errors mid-field convert to `InvalidRequest` like the ones above.
        let stored = state.store.store(field, &original_name).await?;
        return Ok(Json(UploadResponse::from(stored)));
    }

    Err(AppError::NoContent)
}

/// GET /photos - list public URLs
async fn list_photos(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let photos = state.store.list().await?;
    Ok(Json(photos.into_iter().map(|f| f.public_url).collect()))
}

/// DELETE /photos/{filename}
async fn delete_photo(
    State(state): State<AppState>,
    filename: Result<Path<String>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(filename) = filename.map_err(|e| AppError::InvalidName(e.body_text()))?;
    state.store.delete(&filename).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
