//! The `---` delimited `key: value` header at the top of a post file.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::parse_tag_list;
use crate::error::DomainError;

pub const DELIMITER: &str = "---";

// Non-greedy: the first `---` line after the opening one closes the block.
static DOCUMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)(.*)\z")
        .expect("invalid document regex")
});

/// A frontmatter value: either a scalar or a `[...]` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Parsed frontmatter entries, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, Value)>,
}

impl Frontmatter {
    /// Parse the lines between the delimiters.
    ///
    /// Lines without a colon or with an empty key are skipped. A repeated key
    /// keeps its last value.
    pub fn parse(block: &str) -> Self {
        let entries = block
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), parse_value(value)))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Scalar text for `key`; lists are joined with ", ".
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            Value::Scalar(text) => text.clone(),
            Value::List(items) => items.join(", "),
        })
    }

    /// Non-empty text for `key`, or `default`.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// List value for `key`; a scalar is treated as a comma-joined list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Scalar(text)) => parse_tag_list(text),
            None => Vec::new(),
        }
    }

    /// `true` only for a literal or quoted `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Scalar(text)) if text == "true")
    }

    pub fn number(&self, key: &str) -> Option<u32> {
        match self.get(key) {
            Some(Value::Scalar(text)) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_value(raw: &str) -> Value {
    let mut value = raw.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value = &value[1..value.len() - 1];
    }

    if value.starts_with('[') && value.ends_with(']') {
        let items = value[1..value.len() - 1]
            .split(',')
            .map(|item| item.trim().replace('"', ""))
            .filter(|item| !item.is_empty())
            .collect();
        return Value::List(items);
    }

    Value::Scalar(value.to_string())
}

/// A post file split into its header and Markdown body.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    pub frontmatter: Frontmatter,
    pub body: &'a str,
}

impl<'a> Document<'a> {
    /// Split `text` on its leading frontmatter block.
    pub fn split(text: &'a str) -> Result<Self, DomainError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let Some(caps) = DOCUMENT_RE.captures(text) else {
            let reason = if text.starts_with(DELIMITER) {
                "frontmatter block has no closing delimiter"
            } else {
                "file does not start with a frontmatter block"
            };
            return Err(DomainError::InvalidFormat(reason.to_string()));
        };

        let block = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        Ok(Self {
            frontmatter: Frontmatter::parse(block),
            body,
        })
    }

    /// A document with no header, for files that could not be split.
    pub fn headerless(text: &'a str) -> Self {
        Self {
            frontmatter: Frontmatter::default(),
            body: text,
        }
    }
}

/// Builds a frontmatter block line by line.
#[derive(Debug)]
pub struct FrontmatterWriter {
    out: String,
}

impl Default for FrontmatterWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmatterWriter {
    pub fn new() -> Self {
        let mut out = String::with_capacity(1024);
        out.push_str(DELIMITER);
        out.push('\n');
        Self { out }
    }

    /// `key: "value"` - the value is written verbatim, embedded quotes included.
    pub fn quoted(&mut self, key: &str, value: &str) -> &mut Self {
        self.line(key, &format!("\"{value}\""))
    }

    /// `key: value` with no quoting, for dates, numbers and booleans.
    pub fn bare(&mut self, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(key, &value.to_string())
    }

    /// `key: ["a", "b"]`
    pub fn list(&mut self, key: &str, items: &[String]) -> &mut Self {
        let joined = items
            .iter()
            .map(|item| format!("\"{item}\""))
            .collect::<Vec<_>>()
            .join(", ");
        self.line(key, &format!("[{joined}]"))
    }

    fn line(&mut self, key: &str, value: &str) -> &mut Self {
        self.out.push_str(key);
        self.out.push_str(": ");
        self.out.push_str(value);
        self.out.push('\n');
        self
    }

    /// Close the block and append the body after a blank line.
    pub fn finish(mut self, body: &str) -> String {
        self.out.push_str(DELIMITER);
        self.out.push_str("\n\n");
        self.out.push_str(body);
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_first_block_only() {
        let text = "---\ntitle: \"A\"\n---\n\nBody\n\n---\n\nMore\n";
        let doc = Document::split(text).unwrap();
        assert_eq!(doc.frontmatter.text("title").as_deref(), Some("A"));
        assert_eq!(doc.body, "\nBody\n\n---\n\nMore\n");
    }

    #[test]
    fn test_split_accepts_crlf() {
        let doc = Document::split("---\r\ntitle: \"A\"\r\n---\r\nBody").unwrap();
        assert_eq!(doc.frontmatter.text("title").as_deref(), Some("A"));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_split_missing_or_unterminated_block() {
        let err = Document::split("title: x\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidFormat(_)));

        let err = Document::split("---\ntitle: x\nbody without end\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid post format: frontmatter block has no closing delimiter"
        );
    }

    #[test]
    fn test_value_split_on_first_colon_only() {
        let fm = Frontmatter::parse("canonical_url: \"https://example.com:8080/a\"\ntime: 10:30");
        assert_eq!(
            fm.text("canonical_url").as_deref(),
            Some("https://example.com:8080/a")
        );
        assert_eq!(fm.text("time").as_deref(), Some("10:30"));
    }

    #[test]
    fn test_lists_and_flags() {
        let fm = Frontmatter::parse("tags: [\"rust\", \" web \", \"\"]\ndraft: true\nfeatured: \"false\"\nreadTime: 4");
        assert_eq!(fm.list("tags"), vec!["rust", "web"]);
        assert!(fm.flag("draft"));
        assert!(!fm.flag("featured"));
        assert_eq!(fm.number("readTime"), Some(4));
        assert!(fm.list("missing").is_empty());
    }

    #[test]
    fn test_quoted_true_is_a_flag() {
        let fm = Frontmatter::parse("draft: \"true\"");
        assert!(fm.flag("draft"));
    }

    #[test]
    fn test_writer_layout() {
        let mut writer = FrontmatterWriter::new();
        writer
            .quoted("title", "Hello")
            .list("tags", &["a".to_string(), "b".to_string()])
            .bare("draft", true);
        let text = writer.finish("Hi\n\n");
        assert_eq!(
            text,
            "---\ntitle: \"Hello\"\ntags: [\"a\", \"b\"]\ndraft: true\n---\n\nHi\n\n"
        );
    }
}
