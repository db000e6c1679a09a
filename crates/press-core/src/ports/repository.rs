use async_trait::async_trait;

use crate::domain::{Post, PostSummary, SavedPost};
use crate::error::RepoError;

/// Post repository keyed by slug.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Summaries of every stored post, most recently modified first.
    async fn list(&self) -> Result<Vec<PostSummary>, RepoError>;

    /// Load a post for editing, with its body converted back to HTML.
    async fn load(&self, slug: &str) -> Result<Post, RepoError>;

    /// Save a post (create or overwrite).
    async fn save(&self, post: Post) -> Result<SavedPost, RepoError>;

    /// Permanently remove a post.
    async fn delete(&self, slug: &str) -> Result<(), RepoError>;
}
