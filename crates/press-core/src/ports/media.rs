use async_trait::async_trait;

use crate::domain::{StoredMedia, Upload};
use crate::error::RepoError;

/// Storage for uploaded images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Validate and persist an upload, returning where it can be fetched from.
    async fn store(&self, upload: Upload) -> Result<StoredMedia, RepoError>;
}
