//! Post file format: frontmatter header plus Markdown body.

pub mod body;
mod document;
pub mod frontmatter;

pub use body::{html_to_markdown, markdown_to_html, plain_text};
pub use document::{
    LIST_FALLBACK_CATEGORY, PREVIEW_CHARS, WORDS_PER_MINUTE, decode_post, encode_post, read_time,
    summarize,
};
pub use frontmatter::{Document, Frontmatter, FrontmatterWriter};
