use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Local file system photo storage.
///
/// Files are named by a random UUID with no extension and are never
/// overwritten. Nothing here reclaims files that items stop referencing.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn get_full_path(&self, filename: &str) -> Result<PathBuf> {
        // Filenames are generated by `save`; anything that could leave the root is bogus
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(AppError::NotFound("Photo not found".to_string()));
        }
        Ok(self.base_path.join(filename))
    }

    /// Write an incoming byte stream to a new file and return its name
    pub async fn save<S, E>(&self, stream: S) -> Result<String>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Display,
    {
        fs::create_dir_all(&self.base_path).await?;

        let filename = Uuid::new_v4().simple().to_string();
        let full_path = self.base_path.join(&filename);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create photo file: {}", e)))?;

        futures::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(chunk) => file.write_all(&chunk).await.map_err(|e| {
                    AppError::Storage(format!("Failed to write photo file: {}", e))
                }),
                Err(e) => Err(AppError::BadRequest(format!("Failed to read upload: {}", e))),
            };

            if let Err(e) = written {
                drop(file);
                self.remove(&full_path).await;
                return Err(e);
            }
        }

        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush photo file: {}", e)))?;

        tracing::debug!("Saved photo to {:?}", full_path);
        Ok(filename)
    }

    /// Read a stored photo
    pub async fn get(&self, filename: &str) -> Result<Bytes> {
        let full_path = self.get_full_path(filename)?;

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound("Photo not found".to_string())
            } else {
                AppError::Storage(format!("Failed to read photo: {}", e))
            }
        })?;

        Ok(Bytes::from(data))
    }

    /// Remove a stored photo; a missing file is not an error
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let full_path = self.get_full_path(filename)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!("Deleted photo {:?}", full_path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, full_path: &Path) {
        if let Err(e) = fs::remove_file(full_path).await {
            tracing::error!("Failed to remove partial photo {:?}: {}", full_path, e);
        }
    }
}
