//! Data Transfer Objects - request/response payloads for the admin API.

use serde::{Deserialize, Serialize};

use press_core::domain::{Post, PostSummary};

/// `?slug=` query for load and delete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub total: usize,
}

impl From<Vec<PostSummary>> for PostListResponse {
    fn from(posts: Vec<PostSummary>) -> Self {
        Self {
            total: posts.len(),
            posts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub post: Post,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePostResponse {
    pub slug: String,
    pub filepath: String,
}

/// Delete carries nothing beyond the envelope's message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Empty {}
