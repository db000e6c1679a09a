//! Weighted on-page SEO checklist.

use serde::Serialize;

use crate::domain::parse_tag_list;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoCheck {
    pub name: &'static str,
    pub passed: bool,
    pub weight: u32,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoReport {
    /// Weighted average of the check scores, 0 to 100.
    pub score: u32,
    pub checks: Vec<SeoCheck>,
}

/// What the checklist looks at.
#[derive(Debug, Clone, Copy)]
pub struct SeoInput<'a> {
    pub title: &'a str,
    pub meta_description: &'a str,
    pub focus_keywords: &'a str,
    pub html: &'a str,
    /// Visible text of `html`.
    pub text: &'a str,
    pub word_count: usize,
    pub has_featured_image: bool,
}

impl SeoReport {
    pub fn evaluate(input: &SeoInput<'_>) -> Self {
        let title_len = input.title.chars().count();
        let meta_len = input.meta_description.chars().count();
        let keywords: Vec<String> = parse_tag_list(input.focus_keywords)
            .into_iter()
            .map(|keyword| keyword.to_lowercase())
            .collect();
        let text = input.text.to_lowercase();
        let has_links = input.html.contains("<a ") || input.html.contains("href=");
        let has_headings = ["<h1>", "<h2>", "<h3>"]
            .iter()
            .any(|tag| input.html.contains(tag));
        let keywords_in_title = contains_any(&input.title.to_lowercase(), &keywords);

        let checks = vec![
            SeoCheck {
                name: "Title length (50-60 chars optimal)",
                passed: (50..=60).contains(&title_len),
                weight: 10,
                score: title_length_score(title_len),
            },
            SeoCheck {
                name: "Meta description (150-160 chars optimal)",
                passed: (150..=160).contains(&meta_len),
                weight: 10,
                score: meta_length_score(meta_len),
            },
            SeoCheck {
                name: "Focus keywords in title",
                passed: keywords_in_title,
                weight: 15,
                score: if keywords_in_title { 100 } else { 0 },
            },
            SeoCheck {
                name: "Focus keywords in content",
                passed: contains_any(&text, &keywords),
                weight: 15,
                score: keyword_density_score(&text, input.word_count, &keywords),
            },
            SeoCheck {
                name: "Content length (300+ words)",
                passed: input.word_count >= 300,
                weight: 10,
                score: content_length_score(input.word_count),
            },
            SeoCheck {
                name: "Has proper heading structure",
                passed: has_headings,
                weight: 10,
                score: heading_score(input.html),
            },
            SeoCheck {
                name: "Featured image set",
                passed: input.has_featured_image,
                weight: 8,
                score: if input.has_featured_image { 100 } else { 0 },
            },
            SeoCheck {
                name: "Internal/External links present",
                passed: has_links,
                weight: 5,
                score: if has_links { 100 } else { 0 },
            },
            SeoCheck {
                name: "Title is unique and descriptive",
                passed: title_len > 20,
                weight: 7,
                score: title_quality_score(input.title),
            },
            SeoCheck {
                name: "Meta description is descriptive",
                passed: meta_len > 50,
                weight: 10,
                score: meta_quality_score(input.meta_description),
            },
        ];

        let total_weight: u32 = checks.iter().map(|check| check.weight).sum();
        let weighted: u32 = checks.iter().map(|check| check.score * check.weight).sum();
        let score = (f64::from(weighted) / f64::from(total_weight)).round() as u32;

        Self { score, checks }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}

pub fn title_length_score(len: usize) -> u32 {
    match len {
        50..=60 => 100,
        40..=70 => 80,
        30..=80 => 60,
        20.. => 40,
        _ => 20,
    }
}

pub fn meta_length_score(len: usize) -> u32 {
    match len {
        150..=160 => 100,
        120..=180 => 80,
        100..=200 => 60,
        50.. => 40,
        _ => 20,
    }
}

/// Scores keyword occurrences per hundred words; 1-3% is ideal.
pub fn keyword_density_score(text: &str, word_count: usize, keywords: &[String]) -> u32 {
    if keywords.is_empty() || text.is_empty() {
        return 0;
    }
    let hits: usize = keywords
        .iter()
        .map(|keyword| text.matches(keyword.as_str()).count())
        .sum();
    let density = hits as f64 / word_count.max(1) as f64 * 100.0;

    if (1.0..=3.0).contains(&density) {
        100
    } else if (0.5..=4.0).contains(&density) {
        80
    } else if density > 0.0 && density <= 5.0 {
        60
    } else if hits > 0 {
        40
    } else {
        0
    }
}

pub fn content_length_score(word_count: usize) -> u32 {
    match word_count {
        800.. => 100,
        500.. => 90,
        300.. => 80,
        200.. => 60,
        100.. => 40,
        _ => 20,
    }
}

pub fn heading_score(html: &str) -> u32 {
    let score = [("<h1>", 40), ("<h2>", 40), ("<h3>", 20)]
        .iter()
        .filter(|(tag, _)| html.contains(tag))
        .map(|(_, points)| points)
        .sum::<u32>();
    score.min(100)
}

pub fn title_quality_score(title: &str) -> u32 {
    if title.is_empty() {
        return 0;
    }
    let len = title.chars().count();
    let mut score = 0;
    if len >= 20 {
        score += 30;
    }
    if len >= 40 {
        score += 20;
    }
    if title.contains(['?', '!']) {
        score += 10;
    }
    if title.chars().any(|ch| ch.is_ascii_digit()) {
        score += 15;
    }
    if title.split(' ').count() >= 4 {
        score += 25;
    }
    score.min(100)
}

pub fn meta_quality_score(meta: &str) -> u32 {
    if meta.is_empty() {
        return 0;
    }
    let mut score = 0;
    if meta.chars().count() >= 100 {
        score += 40;
    }
    if ["learn", "discover", "guide"].iter().any(|word| meta.contains(word)) {
        score += 20;
    }
    if meta.contains(['?', '!']) {
        score += 10;
    }
    if meta.split(' ').count() >= 15 {
        score += 30;
    }
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(raw: &str) -> Vec<String> {
        parse_tag_list(raw).into_iter().map(|k| k.to_lowercase()).collect()
    }

    #[test]
    fn test_length_tables() {
        assert_eq!(title_length_score(55), 100);
        assert_eq!(title_length_score(45), 80);
        assert_eq!(title_length_score(75), 60);
        assert_eq!(title_length_score(90), 40);
        assert_eq!(title_length_score(5), 20);
        assert_eq!(meta_length_score(155), 100);
        assert_eq!(meta_length_score(60), 40);
        assert_eq!(content_length_score(350), 80);
    }

    #[test]
    fn test_keyword_density() {
        let text = format!("rust {}", "word ".repeat(49));
        assert_eq!(keyword_density_score(&text, 50, &keywords("Rust")), 100);
        assert_eq!(keyword_density_score(&text, 50, &keywords("")), 0);
        assert_eq!(keyword_density_score(&text, 50, &keywords("go")), 0);
        let dense = "rust rust rust rust";
        assert_eq!(keyword_density_score(dense, 4, &keywords("rust")), 40);
    }

    #[test]
    fn test_headings_and_quality() {
        assert_eq!(heading_score("<h1>a</h1><h2>b</h2><h3>c</h3>"), 100);
        assert_eq!(heading_score("<h3>c</h3>"), 20);
        assert_eq!(title_quality_score("10 Ways to Learn Rust Today!"), 80);
        assert_eq!(title_quality_score("Is This the 1 Rust Guide You Need This Year?"), 100);
        assert_eq!(title_quality_score(""), 0);
        assert_eq!(meta_quality_score("A short guide"), 20);
    }

    #[test]
    fn test_empty_post_scores_low() {
        let report = SeoReport::evaluate(&SeoInput {
            title: "",
            meta_description: "",
            focus_keywords: "",
            html: "",
            text: "",
            word_count: 0,
            has_featured_image: false,
        });
        assert_eq!(report.checks.len(), 10);
        // 20*10 + 20*10 + 20*10 = 600 over a total weight of 100.
        assert_eq!(report.score, 6);
    }
}
