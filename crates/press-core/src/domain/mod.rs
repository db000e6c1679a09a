//! Domain entities - the core business objects.

mod media;
mod post;

pub use media::{DEFAULT_MAX_UPLOAD_BYTES, ImageType, StoredMedia, Upload};
pub use post::{
    DEFAULT_CATEGORY, DEFAULT_ROBOTS_META, DEFAULT_SCHEMA_TYPE, DEFAULT_VISIBILITY, Post,
    PostStatus, PostSummary, SavedPost, parse_tag_list,
};
