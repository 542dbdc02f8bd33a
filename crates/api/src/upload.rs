//! Multipart form handling and blob staging for upload endpoints.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Multipart;
use soundloft_core::storage::{self, BlobFolder, BlobStore};

use crate::error::{AppError, AppResult};

/// One file part of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// A fully buffered multipart form, split into text fields and files.
///
/// Parts carrying a filename are files; everything else is text. A file
/// part with neither a name nor content (an empty file input) is dropped.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.files.insert(name, UploadedFile { file_name, data });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A text field, with blank values treated as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).filter(|s| !s.is_empty())
    }

    /// A text field as sent, trimmed. `Some("")` means the client sent the
    /// field blank, which update endpoints read as "clear this value".
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim())
    }

    /// A required text field.
    pub fn require_text(&self, name: &'static str) -> AppResult<&str> {
        self.text(name)
            .ok_or_else(|| AppError::field(name, "This field is required."))
    }

    /// Parse an optional numeric field. Blank means absent.
    pub fn number<T: FromStr>(&self, name: &'static str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::field(name, "A valid number is required."))
            })
            .transpose()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// A required file part.
    pub fn require_file(&mut self, name: &'static str) -> AppResult<UploadedFile> {
        self.take_file(name)
            .ok_or_else(|| AppError::field(name, "No file was submitted."))
    }
}

/// Blobs written during one request, removed again unless the request
/// gets as far as [`StagedBlobs::commit`].
///
/// Rows are inserted only after their blobs are stored. When the insert
/// fails the caller awaits [`StagedBlobs::discard`]. When the request future
/// is dropped instead (a timeout or a client disconnect), `Drop` spawns the
/// same cleanup on the runtime.
pub struct StagedBlobs {
    store: Arc<dyn BlobStore>,
    keys: Vec<String>,
}

impl StagedBlobs {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            keys: Vec::new(),
        }
    }

    /// Store `data` under a fresh key in `folder` and return the key.
    pub async fn put(&mut self, folder: BlobFolder, ext: &str, data: &[u8]) -> AppResult<String> {
        let key = storage::new_key(folder, ext);
        self.keys.push(key.clone());
        if let Err(e) = self.store.put(&key, data).await {
            self.discard_keys().await;
            return Err(e.into());
        }
        Ok(key)
    }

    /// The blobs are now referenced by a row; keep them.
    pub fn commit(mut self) {
        self.keys.clear();
    }

    /// Roll back every blob stored so far.
    pub async fn discard(mut self) {
        self.discard_keys().await;
    }

    async fn discard_keys(&mut self) {
        let keys = std::mem::take(&mut self.keys);
        storage::remove_all(self.store.as_ref(), keys).await;
    }
}

impl Drop for StagedBlobs {
    fn drop(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        let keys = std::mem::take(&mut self.keys);
        let store = Arc::clone(&self.store);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(blobs = keys.len(), "Upload abandoned, removing staged blobs");
                handle.spawn(async move {
                    storage::remove_all(store.as_ref(), keys).await;
                });
            }
            Err(_) => {
                tracing::error!(?keys, "Upload abandoned outside a runtime, blobs left behind");
            }
        }
    }
}
