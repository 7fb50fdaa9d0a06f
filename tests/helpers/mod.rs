//! Test helpers: build AppState and router over a temporary store.
//!
//! Run with: `cargo test --test photos_test`

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use photo_store::config::{Config, ServerConfig, StorageConfig};
use photo_store::{create_router, AppState, PhotoStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the temporary directories it owns.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of the files currently on disk, sorted.
    pub fn stored_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("upload dir readable")
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_prefix("/uploads").await
}

/// Setup test app with isolated upload and public directories.
pub async fn setup_test_app_with_prefix(prefix: &str) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let upload_dir = temp_dir.path().join("uploads");
    let public_dir = temp_dir.path().join("public");
    std::fs::create_dir(&public_dir).expect("Failed to create public dir");

    let storage = StorageConfig {
        upload_dir: upload_dir.clone(),
        public_dir: public_dir.clone(),
        public_url_prefix: prefix.to_string(),
    };
    let config = Config {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_allowed_origins: Vec::new(),
        },
        storage: storage.clone(),
    };

    let store = PhotoStore::open(&storage)
        .await
        .expect("Failed to open photo store");
    let state = AppState {
        store: Arc::new(store),
        config,
    };

    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        public_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with one `photo` file part.
pub fn photo_form(file_name: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(file_name)
        .mime_type("image/png");
    MultipartForm::new().add_part("photo", part)
}

/// Upload a photo and return the JSON response body.
pub async fn upload(client: &TestServer, file_name: &str, data: &[u8]) -> serde_json::Value {
    let response = client
        .post("/upload")
        .multipart(photo_form(file_name, data))
        .await;
    assert_eq!(response.status_code(), 200, "upload {}", file_name);
    response.json::<serde_json::Value>()
}

/// True if `name` looks like `<digits>-<suffix>`.
pub fn has_stored_name_shape(name: &str, suffix: &str) -> bool {
    match name.split_once('-') {
        Some((millis, rest)) => {
            !millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()) && rest == suffix
        }
        None => false,
    }
}
