//! Flesch reading ease and grade level.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::stats::{sentences, words};

static SILENT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("invalid suffix regex")
});
static LEADING_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").expect("invalid prefix regex"));
static VOWEL_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").expect("invalid vowel regex"));

const LABELS: [(f64, &str); 6] = [
    (30.0, "Very Difficult"),
    (50.0, "Difficult"),
    (60.0, "Fairly Difficult"),
    (70.0, "Standard"),
    (80.0, "Fairly Easy"),
    (90.0, "Easy"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readability {
    pub flesch_score: f64,
    pub label: &'static str,
    pub grade_level: u8,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
}

impl Readability {
    pub fn measure(text: &str) -> Self {
        let words: Vec<&str> = words(text).collect();
        let sentence_count = sentences(text).count();
        let syllables: usize = words.iter().map(|word| count_syllables(word)).sum();

        let asl = ratio(words.len(), sentence_count);
        let asw = ratio(syllables, words.len());

        let flesch = 206.835 - 1.015 * asl - 84.6 * asw;
        let grade = (0.39 * asl + 11.8 * asw - 15.59).round().clamp(1.0, 16.0);

        Self {
            flesch_score: flesch.round(),
            label: label_for(flesch),
            grade_level: grade as u8,
            avg_sentence_length: asl.round(),
            avg_syllables_per_word: (asw * 100.0).round() / 100.0,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

pub fn label_for(score: f64) -> &'static str {
    LABELS
        .iter()
        .find(|(limit, _)| score < *limit)
        .map_or("Excellent", |(_, label)| label)
}

/// Heuristic English syllable count; never less than one.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }
    let word = SILENT_SUFFIX.replace(&word, "");
    let word = LEADING_Y.replace(&word, "");
    VOWEL_GROUP.find_iter(&word).count().max(1)
}
