use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Allowed image extensions
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

const MAX_NAME_ATTEMPTS: usize = 3;

/// Returns the lowercased extension of `filename` when it is an allowed image
/// type. Only the name is checked, never the content.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, extension) = filename.rsplit_once('.')?;
    let extension = extension.to_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Gallery image storage rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Writes `data` under a fresh `<uuid-hex>.<ext>` name and returns that
    /// name. The client's filename only contributes its extension.
    pub async fn save(&self, original_filename: &str, data: &[u8]) -> Result<String> {
        let extension = allowed_extension(original_filename).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create uploads directory: {}", e))
        })?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let new_filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
            let file_path = self.path_for(&new_filename);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::Storage(format!("Failed to create file: {}", e)));
                }
            };

            file.write_all(data).await.map_err(|e| {
                AppError::Storage(format!("Failed to write file: {}", e))
            })?;
            file.flush().await?;

            tracing::debug!("Stored upload {} ({} bytes)", new_filename, data.len());
            return Ok(new_filename);
        }

        Err(AppError::Storage("Could not allocate a unique filename".to_string()))
    }

    pub async fn remove(&self, filename: &str) -> std::io::Result<()> {
        fs::remove_file(self.path_for(filename)).await
    }
}
