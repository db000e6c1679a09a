//! schema.org JSON-LD for a post.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::domain::{DEFAULT_SCHEMA_TYPE, Post};

pub const DEFAULT_PUBLISHER: &str = "SnapSkillz";
pub const DEFAULT_PUBLISHER_LOGO: &str = "/logo.png";

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Build the article markup. Unset dates fall back to `now`.
pub fn article_schema(post: &Post, word_count: usize, now: DateTime<Utc>) -> Value {
    let now_iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let published = post
        .publish_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| now_iso.clone());
    let image = non_empty(&post.og_image).or(post.featured_image.as_deref().and_then(non_empty));

    json!({
        "@context": "https://schema.org",
        "@type": non_empty(&post.schema_type).unwrap_or(DEFAULT_SCHEMA_TYPE),
        "headline": post.title,
        "description": post.meta_description,
        "author": {
            "@type": "Person",
            "name": post.author,
            "description": post.author_bio,
        },
        "publisher": {
            "@type": "Organization",
            "name": non_empty(&post.publisher_name).unwrap_or(DEFAULT_PUBLISHER),
            "logo": {
                "@type": "ImageObject",
                "url": non_empty(&post.publisher_logo).unwrap_or(DEFAULT_PUBLISHER_LOGO),
            },
        },
        "datePublished": published,
        "dateModified": now_iso,
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": non_empty(&post.canonical_url),
        },
        "image": image,
        "keywords": post.tags_joined(),
        "articleSection": post.category,
        "wordCount": word_count,
    })
}
