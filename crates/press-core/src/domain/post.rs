use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;
use crate::slug;

pub const DEFAULT_CATEGORY: &str = "technology";
pub const DEFAULT_ROBOTS_META: &str = "index,follow";
pub const DEFAULT_SCHEMA_TYPE: &str = "Article";
pub const DEFAULT_VISIBILITY: &str = "public";

/// Publication state of a post. Persisted as the `draft` frontmatter flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

impl PostStatus {
    pub fn is_draft(self) -> bool {
        self == PostStatus::Draft
    }

    /// `draft: true` and `draft: "true"` both mean draft; anything else is published.
    pub fn from_draft_flag(value: &str) -> Self {
        if value.trim() == "true" {
            PostStatus::Draft
        } else {
            PostStatus::Published
        }
    }
}

impl<'de> Deserialize<'de> for PostStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("draft") => PostStatus::Draft,
            _ => PostStatus::Published,
        })
    }
}

/// Post entity - the editor's working copy of a blog post.
///
/// The JSON shape matches what the admin editor posts: camelCase keys, tags as
/// a comma-joined string, `content` as HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub author_bio: String,
    pub content: String,
    pub meta_description: String,
    pub focus_keywords: String,
    #[serde(rename = "canonicalURL")]
    pub canonical_url: String,
    pub robots_meta: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub category: String,
    #[serde(with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "non_empty")]
    pub featured_image: Option<String>,
    pub featured: bool,
    pub schema_type: String,
    pub publisher_name: String,
    pub publisher_logo: String,
    #[serde(flatten, with = "status_keys")]
    pub status: PostStatus,
    pub visibility: String,
    #[serde(deserialize_with = "lenient_date")]
    pub publish_date: Option<NaiveDate>,
    pub read_time: u32,
}

impl Default for Post {
    fn default() -> Self {
        Self {
            slug: String::new(),
            title: String::new(),
            author: String::new(),
            author_bio: String::new(),
            content: String::new(),
            meta_description: String::new(),
            focus_keywords: String::new(),
            canonical_url: String::new(),
            robots_meta: DEFAULT_ROBOTS_META.to_string(),
            og_title: String::new(),
            og_description: String::new(),
            og_image: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            featured_image: None,
            featured: false,
            schema_type: DEFAULT_SCHEMA_TYPE.to_string(),
            publisher_name: String::new(),
            publisher_logo: String::new(),
            status: PostStatus::Published,
            visibility: DEFAULT_VISIBILITY.to_string(),
            publish_date: None,
            read_time: 0,
        }
    }
}

impl Post {
    /// Create a new post with the required fields and default metadata.
    pub fn new(title: impl Into<String>, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Check the fields a post cannot be saved without.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("content", &self.content),
            ("author", &self.author),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// The slug this post is stored under: the supplied one if present,
    /// otherwise one derived from the title.
    pub fn resolve_slug(&self) -> Result<String, DomainError> {
        let supplied = self.slug.trim();
        if !supplied.is_empty() {
            if !slug::is_canonical(supplied) {
                return Err(DomainError::Validation(format!(
                    "Invalid slug '{supplied}': use lowercase letters, digits and single hyphens"
                )));
            }
            return Ok(supplied.to_string());
        }

        let derived = slug::slugify(&self.title);
        if derived.is_empty() {
            return Err(DomainError::Validation(
                "Cannot derive a slug from the title".to_string(),
            ));
        }
        Ok(derived)
    }

    /// Fill empty optional fields with the values the site expects.
    pub fn apply_defaults(&mut self) {
        fill(&mut self.category, DEFAULT_CATEGORY);
        fill(&mut self.robots_meta, DEFAULT_ROBOTS_META);
        fill(&mut self.schema_type, DEFAULT_SCHEMA_TYPE);
        fill(&mut self.visibility, DEFAULT_VISIBILITY);
        if self
            .featured_image
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.featured_image = None;
        }
    }

    /// Tags in their comma-joined transit form.
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}

fn fill(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}

/// Split a comma-joined tag string, trimming members and dropping empty ones.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPost {
    pub slug: String,
    pub path: PathBuf,
    pub status: PostStatus,
}

/// List-view projection of a stored post, built from frontmatter only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub image: String,
    pub read_time: u32,
    pub draft: bool,
    pub publish_date: String,
    pub preview: String,
    pub last_modified: DateTime<Utc>,
    pub file_size: u64,
}

mod tag_list {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Text(String),
        List(Vec<String>),
    }

    pub fn serialize<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&tags.join(", "))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Option::<Tags>::deserialize(deserializer)? {
            Some(Tags::Text(raw)) => super::parse_tag_list(&raw),
            Some(Tags::List(items)) => items
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            None => Vec::new(),
        })
    }
}

/// The editor reads `publishStatus` and sends it alongside `status` on save;
/// both keys are written, and `status` wins when both are read.
mod status_keys {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::PostStatus;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Keys {
        status: Option<PostStatus>,
        publish_status: Option<PostStatus>,
    }

    pub fn serialize<S: Serializer>(status: &PostStatus, serializer: S) -> Result<S::Ok, S::Error> {
        Keys {
            status: Some(*status),
            publish_status: Some(*status),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PostStatus, D::Error> {
        let keys = Keys::deserialize(deserializer)?;
        Ok(keys.status.or(keys.publish_status).unwrap_or_default())
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

// The editor sends "" for an unset date; treat anything unparseable as unset.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_missing_fields() {
        let post = Post::new("Title", "", " ");
        let err = post.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Missing required fields: content, author"
        );
    }

    #[test]
    fn test_resolve_slug_from_title() {
        let post = Post::new("Hello World", "Jane", "<p>Hi</p>");
        assert_eq!(post.resolve_slug().unwrap(), "hello-world");
    }

    #[test]
    fn test_resolve_slug_rejects_unsafe_slug() {
        let mut post = Post::new("Hello", "Jane", "<p>Hi</p>");
        post.slug = "../etc/passwd".to_string();
        assert!(matches!(post.resolve_slug(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_deserialize_editor_payload() {
        let json = r#"{
            "title": "Hello",
            "author": "Jane",
            "content": "<p>Hi</p>",
            "tags": "rust, web,, cms ",
            "canonicalURL": "https://example.com/hello",
            "featuredImage": "",
            "publishDate": "",
            "publishStatus": "draft"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();

        assert_eq!(post.tags, vec!["rust", "web", "cms"]);
        assert_eq!(post.canonical_url, "https://example.com/hello");
        assert_eq!(post.featured_image, None);
        assert_eq!(post.publish_date, None);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_unknown_status_is_published() {
        let post: Post = serde_json::from_str(r#"{"status": "scheduled"}"#).unwrap();
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn test_status_wins_over_publish_status() {
        let json = r#"{"title":"Hello","author":"Jane","content":"<p>Hi</p>","publishStatus":"draft","status":"published"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.status, PostStatus::Published);

        let json = r#"{"publishStatus":"published","status":"draft"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn test_missing_status_is_published() {
        let post: Post = serde_json::from_str(r#"{"title":"Hello"}"#).unwrap();
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn test_serialize_status_under_both_keys() {
        let mut post = Post::new("T", "A", "<p>x</p>");
        post.status = PostStatus::Published;
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["status"], "published");
        assert_eq!(value["publishStatus"], "published");

        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_serialize_tags_as_joined_string() {
        let mut post = Post::new("T", "A", "<p>x</p>");
        post.tags = vec!["a".to_string(), "b".to_string()];
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["tags"], "a, b");
        assert_eq!(value["canonicalURL"], "");
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut post = Post::new("T", "A", "<p>x</p>");
        post.category = " ".to_string();
        post.featured_image = Some(String::new());
        post.apply_defaults();
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.featured_image, None);
    }
}
