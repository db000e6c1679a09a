//! Mapping between [`Post`] records and post files.

use chrono::{DateTime, NaiveDate, Utc};

use super::body::{html_to_markdown, markdown_to_html, plain_text};
use super::frontmatter::{Document, FrontmatterWriter};
use crate::domain::{
    DEFAULT_CATEGORY, DEFAULT_ROBOTS_META, DEFAULT_SCHEMA_TYPE, DEFAULT_VISIBILITY, Post,
    PostStatus, PostSummary,
};
use crate::error::DomainError;

pub const WORDS_PER_MINUTE: usize = 200;
pub const PREVIEW_CHARS: usize = 200;

/// Category shown for listed files that do not declare one.
pub const LIST_FALLBACK_CATEGORY: &str = "general";

/// Minutes to read `html`, rounded up, never less than one.
pub fn read_time(html: &str) -> u32 {
    let words = plain_text(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Serialize a post to the on-disk format.
///
/// Key order and quoting match the files the site already has, so a re-saved
/// post only differs where its content changed.
pub fn encode_post(post: &Post) -> String {
    let mut fm = FrontmatterWriter::new();

    fm.quoted("title", &post.title)
        .quoted("description", &post.meta_description)
        .quoted("author", &post.author);
    if !post.author_bio.is_empty() {
        fm.quoted("author_bio", &post.author_bio);
    }
    if let Some(date) = post.publish_date {
        fm.bare("publishDate", date.format("%Y-%m-%d"));
    }
    fm.quoted("category", or_default(&post.category, DEFAULT_CATEGORY))
        .list("tags", &post.tags)
        .bare("featured", post.featured)
        .quoted("image", post.featured_image.as_deref().unwrap_or_default())
        .bare("readTime", read_time(&post.content))
        .bare("draft", post.status.is_draft())
        .quoted("focus_keywords", &post.focus_keywords)
        .quoted("canonical_url", &post.canonical_url)
        .quoted("robots_meta", or_default(&post.robots_meta, DEFAULT_ROBOTS_META))
        .quoted("og_title", &post.og_title)
        .quoted("og_description", &post.og_description)
        .quoted("og_image", &post.og_image)
        .quoted("schema_type", or_default(&post.schema_type, DEFAULT_SCHEMA_TYPE))
        .quoted("publisher_name", &post.publisher_name)
        .quoted("publisher_logo", &post.publisher_logo)
        .quoted("visibility", or_default(&post.visibility, DEFAULT_VISIBILITY));

    fm.finish(&html_to_markdown(&post.content))
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

/// Parse a post file into an editable record, body converted back to HTML.
pub fn decode_post(slug: &str, text: &str) -> Result<Post, DomainError> {
    let Document { frontmatter: fm, body } = Document::split(text)?;

    let featured_image = fm.text("image").filter(|url| !url.is_empty());
    let og_image = fm
        .text("og_image")
        .filter(|url| !url.is_empty())
        .or_else(|| featured_image.clone())
        .unwrap_or_default();
    let content = markdown_to_html(body);

    Ok(Post {
        slug: slug.to_string(),
        title: fm.text("title").unwrap_or_default(),
        author: fm.text("author").unwrap_or_default(),
        author_bio: fm.text("author_bio").unwrap_or_default(),
        meta_description: fm.text("description").unwrap_or_default(),
        focus_keywords: fm.text("focus_keywords").unwrap_or_default(),
        canonical_url: fm.text("canonical_url").unwrap_or_default(),
        robots_meta: fm.text_or("robots_meta", DEFAULT_ROBOTS_META),
        og_title: fm.text("og_title").unwrap_or_default(),
        og_description: fm.text("og_description").unwrap_or_default(),
        og_image,
        category: fm.text_or("category", DEFAULT_CATEGORY),
        tags: fm.list("tags"),
        featured_image,
        featured: fm.flag("featured"),
        schema_type: fm.text_or("schema_type", DEFAULT_SCHEMA_TYPE),
        publisher_name: fm.text("publisher_name").unwrap_or_default(),
        publisher_logo: fm.text("publisher_logo").unwrap_or_default(),
        status: PostStatus::from_draft_flag(&fm.text("draft").unwrap_or_default()),
        visibility: fm.text_or("visibility", DEFAULT_VISIBILITY),
        publish_date: fm.text("publishDate").and_then(|raw| parse_date(&raw)),
        read_time: fm.number("readTime").unwrap_or_else(|| read_time(&content)),
        content,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Build the list-view summary of a post from its frontmatter and raw body.
/// The body is not converted to HTML.
pub fn summarize(
    slug: &str,
    document: &Document<'_>,
    last_modified: DateTime<Utc>,
    file_size: u64,
) -> PostSummary {
    let fm = &document.frontmatter;

    PostSummary {
        slug: slug.to_string(),
        title: fm.text_or("title", slug),
        description: fm.text("description").unwrap_or_default(),
        author: fm.text("author").unwrap_or_default(),
        category: fm.text_or("category", LIST_FALLBACK_CATEGORY),
        tags: fm.list("tags"),
        featured: fm.flag("featured"),
        image: fm.text("image").unwrap_or_default(),
        read_time: fm.number("readTime").unwrap_or(0),
        draft: fm.flag("draft"),
        publish_date: fm.text("publishDate").unwrap_or_default(),
        preview: preview(document.body),
        last_modified,
        file_size,
    }
}

fn preview(body: &str) -> String {
    let text = plain_text(body);
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
