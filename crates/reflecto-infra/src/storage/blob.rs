//! File-backed session blob store.
//!
//! One durable blob per conversation under `{data_dir}/sessions/{id}.json`.
//! The store treats blob contents as opaque bytes; the conversation format
//! is owned entirely by `ConversationStore::serialize`/`restore`.

use std::path::PathBuf;

use uuid::Uuid;

use reflecto_types::error::StorageError;

/// Durable per-session blob storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct SessionBlobStore {
    root: PathBuf,
}

impl SessionBlobStore {
    /// Create a store rooted at `{data_dir}/sessions`.
    ///
    /// The directory is created lazily on first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into().join("sessions"),
        }
    }

    fn blob_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Load the blob for a session, or `None` when absent.
    pub async fn load(&self, id: &Uuid) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.blob_path(id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the blob for a session, replacing any previous contents.
    pub async fn save(&self, id: &Uuid, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.blob_path(id), bytes).await?;
        Ok(())
    }

    /// Delete the blob for a session.
    ///
    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: &Uuid) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.blob_path(id)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
