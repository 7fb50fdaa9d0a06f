use super::naming::{validate_stored_name, NameGenerator};
use crate::config::StorageConfig;
use crate::models::StoredFile;
use crate::types::{AppError, AppResult};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Everything but unreserved URL characters is escaped in a name segment.
const NAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Owns the upload directory: every regular file directly under `root` is a stored photo.
#[derive(Debug)]
pub struct PhotoStore {
    root: PathBuf,
    url_prefix: String,
    names: NameGenerator,
}

impl PhotoStore {
    /// Create a store handle without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: normalize_prefix(url_prefix),
            names: NameGenerator::new(),
        }
    }

    /// Create a store from configuration and make sure its root exists.
    pub async fn open(config: &StorageConfig) -> AppResult<Self> {
        let store = Self::new(&config.upload_dir, &config.public_url_prefix);
        store.ensure().await?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prefix every public URL starts with, always ending in `/`.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create the store root if it is missing. Safe to call repeatedly.
    pub async fn ensure(&self) -> AppResult<()> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(AppError::StorageUnavailable(format!(
                    "{} exists and is not a directory",
                    self.root.display()
                )))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::StorageUnavailable(format!(
                    "Failed to inspect {}: {}",
                    self.root.display(),
                    e
                )))
            }
        }

        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::StorageUnavailable(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        info!(path = %self.root.display(), "Created upload directory");
        Ok(())
    }

    /// URL the static file service answers for `name`, with the name percent-encoded.
    pub fn public_url(&self, name: &str) -> String {
        format!("{}{}", self.url_prefix, utf8_percent_encode(name, NAME_SEGMENT))
    }

    fn stored_file(&self, name: String) -> StoredFile {
        StoredFile {
            path: self.root.join(&name),
            public_url: self.public_url(&name),
            name,
        }
    }

    /// Persist an upload under a freshly generated name.
    ///
    /// The file is created with create-new semantics, so an existing photo is
    /// never overwritten. A stream or write error removes the partial file
    /// (best effort). Stream errors surface as whatever `AppError` they convert
    /// to; write errors are `WriteFailure`.
    pub async fn store<S, E>(&self, content: S, original_name: &str) -> AppResult<StoredFile>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<AppError>,
    {
        let name = self.names.generate(original_name)?;
        let file = self.stored_file(name);
        let start = std::time::Instant::now();

        let mut handle = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file.path)
            .await
            .map_err(|e| {
                AppError::WriteFailure(format!(
                    "Failed to create file {}: {}",
                    file.path.display(),
                    e
                ))
            })?;

        futures::pin_mut!(content);
        let mut size: u64 = 0;
        let written: AppResult<()> = async {
            while let Some(chunk) = content.next().await {
                let chunk = chunk.map_err(Into::<AppError>::into)?;
                handle.write_all(&chunk).await.map_err(|e| {
                    AppError::WriteFailure(format!(
                        "Failed to write file {}: {}",
                        file.path.display(),
                        e
                    ))
                })?;
                size += chunk.len() as u64;
            }
            handle.sync_all().await.map_err(|e| {
                AppError::WriteFailure(format!(
                    "Failed to sync file {}: {}",
                    file.path.display(),
                    e
                ))
            })
        }
        .await;
        drop(handle);

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&file.path).await {
                warn!(
                    path = %file.path.display(),
                    error = %cleanup,
                    "Failed to remove partial upload"
                );
            }
            return Err(e);
        }

        info!(
            name = %file.name,
            path = %file.path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo stored"
        );

        Ok(file)
    }

    /// Convenience wrapper around [`PhotoStore::store`] for in-memory content.
    pub async fn store_bytes(
        &self,
        content: impl Into<Bytes>,
        original_name: &str,
    ) -> AppResult<StoredFile> {
        let chunk: AppResult<Bytes> = Ok(content.into());
        self.store(futures::stream::once(async move { chunk }), original_name)
            .await
    }

    /// Enumerate the stored photos, sorted by name.
    pub async fn list(&self) -> AppResult<Vec<StoredFile>> {
        let unavailable = |e: std::io::Error| {
            AppError::ListUnavailable(format!("Failed to read {}: {}", self.root.display(), e))
        };

        let mut entries = fs::read_dir(&self.root).await.map_err(unavailable)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "Skipping stored file with non UTF-8 name"),
            }
        }

        names.sort();
        debug!(count = names.len(), "Listed stored photos");

        Ok(names.into_iter().map(|n| self.stored_file(n)).collect())
    }

    /// Permanently remove the photo called exactly `name`.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        validate_stored_name(name)?;
        let path = self.root.join(name);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(AppError::NotFound(name.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(name.to_string()))
            }
            Err(e) => {
                return Err(AppError::DeleteFailure(format!(
                    "Failed to inspect {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::NotFound(name.to_string())
            } else {
                AppError::DeleteFailure(format!("Failed to delete {}: {}", path.display(), e))
            }
        })?;

        info!(name = %name, "Photo deleted");
        Ok(())
    }

    /// Whether the store root is currently a readable directory.
    pub async fn is_available(&self) -> bool {
        fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// `"/uploads"`, `"uploads/"` and `"/uploads/"` all become `"/uploads/"`; empty becomes `"/"`.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
