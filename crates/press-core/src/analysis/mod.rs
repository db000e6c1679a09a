//! Editor-side content analysis: statistics, readability, SEO and structured data.
//!
//! Everything here is a pure function of the post being edited.

mod readability;
mod schema;
mod seo;
mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::codec::plain_text;
use crate::domain::Post;

pub use readability::{Readability, count_syllables, label_for};
pub use schema::{DEFAULT_PUBLISHER, DEFAULT_PUBLISHER_LOGO, article_schema};
pub use seo::{SeoCheck, SeoInput, SeoReport};
pub use stats::ContentStats;

/// Full analysis of a post.
#[derive(Debug, Clone, Serialize)]
pub struct ContentReport {
    pub stats: ContentStats,
    pub readability: Readability,
    pub seo: SeoReport,
    pub schema: Value,
}

pub fn analyze(post: &Post, now: DateTime<Utc>) -> ContentReport {
    let text = plain_text(&post.content);
    let stats = ContentStats::measure(&text, &post.content);

    let seo = SeoReport::evaluate(&SeoInput {
        title: &post.title,
        meta_description: &post.meta_description,
        focus_keywords: &post.focus_keywords,
        html: &post.content,
        text: &text,
        word_count: stats.word_count,
        has_featured_image: post.featured_image.is_some(),
    });

    ContentReport {
        readability: Readability::measure(&text),
        schema: article_schema(post, stats.word_count, now),
        seo,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_combines_sections() {
        let mut post = Post::new(
            "Learning Rust in 10 Steps",
            "Jane",
            r#"<h2>Start</h2><p>Rust is fast. Read <a href="/docs">the docs</a> today.</p>"#,
        );
        post.focus_keywords = "rust".to_string();

        let report = analyze(&post, Utc::now());

        assert_eq!(report.stats.word_count, 8);
        assert_eq!(report.stats.paragraph_count, 1);
        let names: Vec<_> = report.seo.checks.iter().filter(|c| c.passed).map(|c| c.name).collect();
        assert!(names.contains(&"Focus keywords in title"));
        assert!(names.contains(&"Internal/External links present"));
        assert!(names.contains(&"Has proper heading structure"));
        assert_eq!(report.schema["wordCount"], 8);
    }
}
