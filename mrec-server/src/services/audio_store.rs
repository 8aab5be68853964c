//! Recording storage
//!
//! Writes each uploaded clip under the recordings directory. Files are only
//! ever created, never rewritten or removed, so concurrent requests need no
//! locking.

use axum::body::Bytes;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Recording storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create recordings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write recording {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes uploaded audio to the recordings directory
#[derive(Debug, Clone)]
pub struct AudioStore {
    root: Arc<PathBuf>,
}

impl AudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    /// Create the recordings directory if it does not exist
    pub async fn ensure_directory(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.root.as_path())
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.root.to_path_buf(),
                source,
            })
    }

    /// Write `payload` to a new file named after `timestamp`
    ///
    /// Returns the path of the created file. An existing file is never
    /// overwritten.
    pub async fn store(
        &self,
        payload: &[u8],
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf, StorageError> {
        self.ensure_directory().await?;

        let path = self
            .root
            .join(mrec_common::time::recording_file_name(&timestamp));

        let write = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await?;
            file.write_all(payload).await?;
            file.flush().await
        };

        write.await.map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Store `payload` on a background task, logging the result
    ///
    /// The caller does not wait for the write and never sees its failure.
    pub fn store_detached(&self, payload: Bytes) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let timestamp = Local::now();
        tokio::spawn(async move {
            match store.store(&payload, timestamp).await {
                Ok(path) => info!(
                    path = %path.display(),
                    bytes = payload.len(),
                    "Recording saved"
                ),
                Err(e) => error!(error = %e, "Failed to save recording"),
            }
        })
    }
}
