//! Blob storage port for uploaded audio and images.
//!
//! Rows only hold a blob *key* (e.g. `tracks/5b0c...e1.mp3`). The
//! [`BlobStore`] behind the key decides where bytes live and which URL
//! serves them. [`LocalBlobStore`] writes under a media root on disk and is
//! what the server uses; another backend only needs to implement the trait.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Top-level folder a blob is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobFolder {
    Tracks,
    CoverArt,
    ProfilePictures,
    ProjectFiles,
}

impl BlobFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tracks => "tracks",
            Self::CoverArt => "cover_arts",
            Self::ProfilePictures => "profile_pics",
            Self::ProjectFiles => "project_files",
        }
    }
}

/// Generate a fresh, collision-free key such as `tracks/<uuid>.wav`.
pub fn new_key(folder: BlobFolder, ext: &str) -> String {
    format!("{}/{}.{ext}", folder.as_str(), Uuid::new_v4().simple())
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` under `key`, replacing any previous content.
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), CoreError>;

    /// Remove `key`. Removing a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> Result<(), CoreError>;

    /// Absolute URL clients use to download `key`.
    fn url(&self, key: &str) -> String;

    /// Check that the store is reachable and accepting writes.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Delete blobs after their rows are gone. Failures are logged, not returned:
/// the rows no longer reference the keys, so a leftover file is only garbage.
pub async fn remove_all<S, I>(store: &S, keys: I)
where
    S: BlobStore + ?Sized,
    I: IntoIterator<Item = String>,
{
    for key in keys {
        if let Err(e) = store.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove orphaned blob");
        }
    }
}

// ---------------------------------------------------------------------------
// Local disk
// ---------------------------------------------------------------------------

/// Stores blobs as files under `root`, served at `{base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto a path inside `root`. Keys with `..`, absolute
    /// components or empty segments are rejected.
    fn resolve(&self, key: &str) -> Result<PathBuf, CoreError> {
        let relative = Path::new(key);
        let well_formed = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !well_formed {
            return Err(CoreError::Validation(format!("Invalid blob key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), CoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Internal(format!("Failed to create {parent:?}: {e}")))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write blob {key}: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to delete blob {key}: {e}"
            ))),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CoreError::Internal(format!("Media root {:?} unavailable: {e}", self.root)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn store(dir: &tempfile::TempDir) -> LocalBlobStore {
        LocalBlobStore::new(dir.path(), "http://localhost:3000/media/")
    }

    #[test]
    fn keys_are_filed_by_folder() {
        let key = new_key(BlobFolder::CoverArt, "png");
        assert!(key.starts_with("cover_arts/"));
        assert!(key.ends_with(".png"));
        assert_ne!(key, new_key(BlobFolder::CoverArt, "png"));
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            store(&dir).url("tracks/a.mp3"),
            "http://localhost:3000/media/tracks/a.mp3"
        );
    }

    #[tokio::test]
    async fn put_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.put("tracks/a.mp3", b"ID3").await.unwrap();
        let on_disk = dir.path().join("tracks/a.mp3");
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"ID3");

        store.delete("tracks/a.mp3").await.unwrap();
        assert!(!on_disk.exists());

        // Deleting again is not an error.
        store.delete("tracks/a.mp3").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert_matches!(
            store.put("../escape.mp3", b"x").await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            store.put("/etc/passwd", b"x").await,
            Err(CoreError::Validation(_))
        );
    }
}
