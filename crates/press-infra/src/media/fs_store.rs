//! Content-addressed image storage on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use press_core::domain::{DEFAULT_MAX_UPLOAD_BYTES, StoredMedia, Upload};
use press_core::error::RepoError;
use press_core::ports::MediaStore;

/// Writes uploads as `<md5>.<ext>` under a public directory.
///
/// Identical bytes map to the same file, so re-uploading an image is a no-op
/// that returns the existing URL.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    dir: PathBuf,
    url_prefix: String,
    max_bytes: u64,
}

impl FsMediaStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn store(&self, upload: Upload) -> Result<StoredMedia, RepoError> {
        let image_type = upload.validate(self.max_bytes)?;

        let hash = format!("{:x}", md5::compute(&upload.bytes));
        let filename = format!("{hash}.{}", image_type.extension());
        let path = self.dir.join(&filename);

        fs::create_dir_all(&self.dir).await?;
        if fs::try_exists(&path).await? {
            tracing::debug!(filename = %filename, "Upload already stored");
        } else {
            fs::write(&path, &upload.bytes).await?;
            tracing::info!(
                filename = %filename,
                client_filename = upload.file_name.as_deref().unwrap_or("-"),
                size = upload.size(),
                "Stored upload"
            );
        }

        Ok(StoredMedia {
            url: format!("{}/{filename}", self.url_prefix),
            filename,
            size: upload.size(),
            content_type: image_type.mime().to_string(),
        })
    }
}
