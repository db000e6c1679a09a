//! Application state - shared across all handlers.

use std::sync::Arc;

use press_core::ports::{MediaStore, PostRepository};
use press_infra::{FsMediaStore, FsPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub media: Arc<dyn MediaStore>,
    /// Upload size cap, checked while the multipart body is still streaming.
    pub max_upload_bytes: u64,
}

impl AppState {
    /// Build the application state with the filesystem adapters.
    pub fn new(config: &AppConfig) -> Self {
        let posts = FsPostRepository::new(&config.content.dir)
            .with_atomic_writes(config.content.atomic_writes);
        let media = FsMediaStore::new(&config.uploads.dir, config.uploads.url_prefix.clone())
            .with_max_bytes(config.uploads.max_bytes);

        tracing::info!(
            content_dir = %config.content.dir.display(),
            upload_dir = %config.uploads.dir.display(),
            "Application state initialized"
        );

        Self {
            posts: Arc::new(posts),
            media: Arc::new(media),
            max_upload_bytes: config.uploads.max_bytes,
        }
    }
}
