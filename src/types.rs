// Error taxonomy shared by the photo store and the HTTP boundary

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("No file uploaded")]
    NoContent,

    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("List unavailable: {0}")]
    ListUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Delete failure: {0}")]
    DeleteFailure(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoContent | AppError::InvalidName(_) | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::StorageUnavailable(_)
            | AppError::WriteFailure(_)
            | AppError::ListUnavailable(_)
            | AppError::DeleteFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to clients. Filesystem details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::StorageUnavailable(_) => "Storage unavailable".to_string(),
            AppError::NoContent => "No file uploaded".to_string(),
            AppError::WriteFailure(_) => "Failed to upload photo".to_string(),
            AppError::ListUnavailable(_) => "Error loading photos".to_string(),
            AppError::NotFound(_) => "File not found".to_string(),
            AppError::DeleteFailure(_) => "Failed to delete file".to_string(),
            AppError::InvalidName(_) => "Invalid file name".to_string(),
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
        }
    }
}

/// Malformed multipart bodies are client errors, including ones that break mid-field.
impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::InvalidRequest(format!("Failed to read multipart body: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }

        let body = Json(serde_json::json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NoContent.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("a.png".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidName("../a".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DeleteFailure("busy".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::ListUnavailable("gone".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_hide_details() {
        let err = AppError::WriteFailure("/srv/uploads/1-a.png: disk full".into());
        assert_eq!(err.client_message(), "Failed to upload photo");

        assert_eq!(AppError::NoContent.client_message(), "No file uploaded");
        assert_eq!(
            AppError::NotFound("x".into()).client_message(),
            "File not found"
        );
    }
}
