use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::codec::{WORDS_PER_MINUTE, plain_text};

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("invalid sentence regex"));

/// Counts shown in the editor's statistics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub word_count: usize,
    pub char_count: usize,
    pub read_time: u32,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_sentence: usize,
}

impl ContentStats {
    pub fn from_html(html: &str) -> Self {
        let text = plain_text(html);
        Self::measure(&text, html)
    }

    /// `text` is the visible text of `html`.
    pub(crate) fn measure(text: &str, html: &str) -> Self {
        let word_count = words(text).count();
        let sentence_count = sentences(text).count().max(1);
        let paragraph_count = html.matches("<p>").count().max(1);

        Self {
            word_count,
            char_count: text.chars().count(),
            read_time: word_count.div_ceil(WORDS_PER_MINUTE).max(1) as u32,
            sentence_count,
            paragraph_count,
            avg_words_per_sentence: (word_count as f64 / sentence_count as f64).round() as usize,
        }
    }
}

pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub(crate) fn sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_END
        .split(text)
        .filter(|sentence| !sentence.trim().is_empty())
}
