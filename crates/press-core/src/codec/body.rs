//! HTML ⇄ Markdown body conversion.
//!
//! Both directions are driven by the same tag/marker tables. This is a lossy
//! best-effort transform for the markup the editor produces, not a parser:
//! unrecognised tags are dropped and nested lists or tables do not survive a
//! round trip.
//!
//! Fragments that must not be rewritten (embedded snippets, code) are moved
//! into a [`Stash`] before conversion and put back at the end.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const EMBED_OPEN: &str = "<!-- EMBEDDED_CONTENT -->";
pub const EMBED_CLOSE: &str = "<!-- /EMBEDDED_CONTENT -->";
pub const EMBED_CLASS: &str = "embedded-content";

/// Inline formatting: the HTML tags that map to a Markdown marker. The first
/// tag is the one emitted when converting back to HTML.
struct InlineRule {
    tags: &'static [&'static str],
    marker: &'static str,
}

// Longer markers first so `**` is not read as two `*`.
const INLINE_RULES: &[InlineRule] = &[
    InlineRule {
        tags: &["strong", "b"],
        marker: "**",
    },
    InlineRule {
        tags: &["s", "del", "strike"],
        marker: "~~",
    },
    InlineRule {
        tags: &["em", "i"],
        marker: "*",
    },
];

const HEADING_LEVELS: usize = 6;

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

fn element(tags: &str) -> Regex {
    Regex::new(&format!(r"(?is)<(?:{tags})(?:\s[^>]*)?>(.*?)</(?:{tags})\s*>"))
        .expect("invalid element regex")
}

static HTML_INLINE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    INLINE_RULES
        .iter()
        .map(|rule| (element(&rule.tags.join("|")), rule.marker))
        .collect()
});

static MD_INLINE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    INLINE_RULES
        .iter()
        .map(|rule| {
            let marker = regex::escape(rule.marker);
            let re = Regex::new(&format!(r"{marker}(\S(?:.*?\S)?){marker}"))
                .expect("invalid marker regex");
            (re, rule.tags[0])
        })
        .collect()
});

static HTML_HEADINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    (1..=HEADING_LEVELS)
        .map(|level| element(&format!("h{level}")))
        .collect()
});

static HTML_PRE: Lazy<Regex> = Lazy::new(|| element("pre"));
static HTML_CODE: Lazy<Regex> = Lazy::new(|| element("code"));
static HTML_PARAGRAPH: Lazy<Regex> = Lazy::new(|| element("p"));
static HTML_BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| element("blockquote"));
static HTML_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(ul|ol)(?:\s[^>]*)?>(.*?)</(?:ul|ol)\s*>").expect("invalid list regex")
});
static HTML_LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<li(\s[^>]*)?>(.*?)</li\s*>").expect("invalid list item regex")
});
static HTML_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<a(\s[^>]*)?>(.*?)</a\s*>").expect("invalid anchor regex")
});
static HTML_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img(\s[^>]*)?/?>").expect("invalid image regex"));
static HTML_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("invalid break regex"));
static HTML_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<hr(?:\s[^>]*)?/?>").expect("invalid rule regex"));
static HTML_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)(?:\s[^>]*)?>.*?</(?:script|style)\s*>")
        .expect("invalid script regex")
});
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));
static HTML_DIV_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(/?)div(?:\s[^>]*)?>").expect("invalid div regex"));

static ATTR_SRC: Lazy<Regex> = Lazy::new(|| attribute_regex("src"));
static ATTR_ALT: Lazy<Regex> = Lazy::new(|| attribute_regex("alt"));
static ATTR_HREF: Lazy<Regex> = Lazy::new(|| attribute_regex("href"));
static ATTR_CLASS: Lazy<Regex> = Lazy::new(|| attribute_regex("class"));
static ATTR_DATA_LIST: Lazy<Regex> = Lazy::new(|| attribute_regex("data-list"));

fn attribute_regex(name: &str) -> Regex {
    Regex::new(&format!(r#"(?i)(?:^|\s){name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#))
        .expect("invalid attribute regex")
}

static EMBED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s){}[ \t]*\r?\n?(.*?)\r?\n?[ \t]*{}",
        regex::escape(EMBED_OPEN),
        regex::escape(EMBED_CLOSE)
    ))
    .expect("invalid embed regex")
});

static MD_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("invalid heading regex"));
static MD_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*+]\s+(.*)$").expect("invalid bullet regex"));
static MD_NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").expect("invalid numbered regex"));
static MD_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").expect("invalid rule regex"));
static MD_CODE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("invalid code span regex"));
static MD_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).expect("invalid image regex")
});
static MD_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[([^\]]+)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).expect("invalid link regex")
});

static STASH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").expect("invalid stash regex"));
static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+\n").expect("invalid blank line regex"));
static TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+\n").expect("invalid whitespace regex"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Fragments held out of conversion, referenced from the text by
/// private-use-area tokens.
#[derive(Debug, Default)]
struct Stash {
    items: Vec<String>,
}

impl Stash {
    fn put(&mut self, fragment: String) -> String {
        let token = format!("\u{E000}{}\u{E001}", self.items.len());
        self.items.push(fragment);
        token
    }

    fn is_token(text: &str) -> bool {
        STASH_TOKEN
            .find(text)
            .is_some_and(|m| m.start() == 0 && m.end() == text.len())
    }

    fn restore(&self, text: &str) -> String {
        STASH_TOKEN
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.items.get(index))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

// ---------------------------------------------------------------------------
// HTML -> Markdown
// ---------------------------------------------------------------------------

/// Convert editor HTML to the Markdown stored on disk.
pub fn html_to_markdown(html: &str) -> String {
    let mut stash = Stash::default();

    let mut text = stash_embedded(html, &mut stash);

    text = HTML_PRE
        .replace_all(&text, |caps: &Captures| {
            let code = decode_entities(&HTML_TAG.replace_all(&caps[1], ""));
            let fenced = format!("```\n{}\n```", code.trim_matches('\n'));
            format!("\n\n{}\n\n", stash.put(fenced))
        })
        .into_owned();

    text = HTML_CODE
        .replace_all(&text, |caps: &Captures| {
            let code = decode_entities(&HTML_TAG.replace_all(&caps[1], ""));
            stash.put(format!("`{code}`"))
        })
        .into_owned();

    text = HTML_IMAGE
        .replace_all(&text, |caps: &Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            match attribute(attrs, &ATTR_SRC) {
                Some(src) => format!(
                    "![{}]({})",
                    attribute(attrs, &ATTR_ALT).unwrap_or_default(),
                    src
                ),
                None => String::new(),
            }
        })
        .into_owned();

    text = HTML_ANCHOR
        .replace_all(&text, |caps: &Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let label = caps[2].trim();
            match attribute(attrs, &ATTR_HREF) {
                Some(href) if !label.is_empty() => format!("[{label}]({href})"),
                _ => label.to_string(),
            }
        })
        .into_owned();

    for (re, marker) in HTML_INLINE.iter() {
        text = re
            .replace_all(&text, |caps: &Captures| {
                let inner = &caps[1];
                if inner.trim().is_empty() {
                    inner.to_string()
                } else {
                    format!("{marker}{inner}{marker}")
                }
            })
            .into_owned();
    }

    for (index, re) in HTML_HEADINGS.iter().enumerate() {
        let hashes = "#".repeat(index + 1);
        text = re
            .replace_all(&text, |caps: &Captures| {
                format!("\n\n{hashes} {}\n\n", single_line(&caps[1]))
            })
            .into_owned();
    }

    text = HTML_BLOCKQUOTE
        .replace_all(&text, |caps: &Captures| {
            let quoted = flatten_block(&caps[1])
                .lines()
                .map(|line| {
                    let line = line.trim();
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n\n{quoted}\n\n")
        })
        .into_owned();

    text = HTML_LIST
        .replace_all(&text, |caps: &Captures| {
            let ordered = caps[1].eq_ignore_ascii_case("ol");
            format!("\n\n{}\n\n", list_to_markdown(&caps[2], ordered))
        })
        .into_owned();

    text = HTML_PARAGRAPH
        .replace_all(&text, |caps: &Captures| format!("\n\n{}\n\n", &caps[1]))
        .into_owned();
    text = HTML_BREAK.replace_all(&text, "\n").into_owned();
    text = HTML_RULE.replace_all(&text, "\n\n---\n\n").into_owned();
    text = HTML_SCRIPT.replace_all(&text, "").into_owned();
    text = HTML_TAG.replace_all(&text, "").into_owned();
    text = decode_entities(&text);

    text = TRAILING_SPACE.replace_all(&text, "\n").into_owned();
    text = BLANK_RUNS.replace_all(&text, "\n\n").into_owned();
    let text = text.trim_start();

    stash.restore(text)
}

/// Move every embedded-content container into the stash as a sentinel block.
///
/// Containers are matched by counting nested `<div>`s so snippets that carry
/// their own divs stay intact.
fn stash_embedded(html: &str, stash: &mut Stash) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = find_embed_open(rest) {
        let Some(end) = matching_div_end(&rest[open.end..]) else {
            break;
        };
        let inner = &rest[open.end..open.end + end.start];
        let sentinel = format!("{EMBED_OPEN}\n{}\n{EMBED_CLOSE}", inner.trim_matches('\n'));

        out.push_str(&rest[..open.start]);
        out.push_str("\n\n");
        out.push_str(&stash.put(sentinel));
        out.push_str("\n\n");
        rest = &rest[open.end + end.end..];
    }

    out.push_str(rest);
    out
}

struct Span {
    start: usize,
    end: usize,
}

fn find_embed_open(html: &str) -> Option<Span> {
    HTML_DIV_TAG
        .captures_iter(html)
        .filter(|caps| caps[1].is_empty())
        .filter_map(|caps| caps.get(0))
        .find(|tag| {
            attribute(&tag.as_str()[4..], &ATTR_CLASS)
                .is_some_and(|class| class.split_whitespace().any(|c| c == EMBED_CLASS))
        })
        .map(|tag| Span {
            start: tag.start(),
            end: tag.end(),
        })
}

/// Span of the `</div>` that closes an already-open div, relative to `html`.
fn matching_div_end(html: &str) -> Option<Span> {
    let mut depth = 1usize;
    for caps in HTML_DIV_TAG.captures_iter(html) {
        let tag = caps.get(0)?;
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(Span {
                    start: tag.start(),
                    end: tag.end(),
                });
            }
        }
    }
    None
}

fn list_to_markdown(items_html: &str, ordered: bool) -> String {
    let mut number = 0;
    HTML_LIST_ITEM
        .captures_iter(items_html)
        .map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            // The editor marks bullet items inside <ol> with data-list="bullet".
            let bullet = match attribute(attrs, &ATTR_DATA_LIST).as_deref() {
                Some("bullet") => true,
                Some("ordered") => false,
                _ => !ordered,
            };
            let content = single_line(&flatten_block(&caps[2]));
            if bullet {
                format!("- {content}")
            } else {
                number += 1;
                format!("{number}. {content}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reduce block-level markup inside a container to plain lines.
fn flatten_block(html: &str) -> String {
    let text = HTML_PARAGRAPH.replace_all(html, "${1}\n");
    let text = HTML_BREAK.replace_all(&text, "\n");
    let text = HTML_TAG.replace_all(&text, "");
    text.trim().to_string()
}

fn single_line(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn attribute(attrs: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

// ---------------------------------------------------------------------------
// Markdown -> HTML
// ---------------------------------------------------------------------------

enum Block {
    Paragraph(Vec<String>),
    List { ordered: bool, items: Vec<String> },
    Quote(Vec<String>),
    Code(Vec<String>),
}

struct HtmlWriter<'s> {
    out: String,
    open: Option<Block>,
    stash: &'s mut Stash,
}

impl HtmlWriter<'_> {
    fn flush(&mut self) {
        let Some(block) = self.open.take() else {
            return;
        };
        let html = match block {
            Block::Paragraph(lines) => format!("<p>{}</p>", self.inline_lines(&lines)),
            Block::Quote(lines) => {
                format!("<blockquote>{}</blockquote>", self.inline_lines(&lines))
            }
            Block::List { ordered, items } => {
                let tag = if ordered { "ol" } else { "ul" };
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", inline_to_html(item, self.stash)))
                    .collect();
                format!("<{tag}>{items}</{tag}>")
            }
            Block::Code(lines) => {
                format!("<pre><code>{}</code></pre>", escape_html(&lines.join("\n")))
            }
        };
        self.out.push_str(&html);
    }

    fn inline_lines(&mut self, lines: &[String]) -> String {
        lines
            .iter()
            .map(|line| inline_to_html(line, self.stash))
            .collect::<Vec<_>>()
            .join("<br>")
    }

    fn push_line(&mut self, line: &str) {
        match &mut self.open {
            Some(Block::Paragraph(lines)) => lines.push(line.to_string()),
            _ => {
                self.flush();
                self.open = Some(Block::Paragraph(vec![line.to_string()]));
            }
        }
    }

    fn push_quote(&mut self, line: &str) {
        match &mut self.open {
            Some(Block::Quote(lines)) => lines.push(line.to_string()),
            _ => {
                self.flush();
                self.open = Some(Block::Quote(vec![line.to_string()]));
            }
        }
    }

    fn push_item(&mut self, ordered: bool, item: &str) {
        match &mut self.open {
            Some(Block::List { ordered: open, items }) if *open == ordered => {
                items.push(item.to_string())
            }
            _ => {
                self.flush();
                self.open = Some(Block::List {
                    ordered,
                    items: vec![item.to_string()],
                });
            }
        }
    }

    fn emit(&mut self, html: &str) {
        self.flush();
        self.out.push_str(html);
    }
}

/// Convert a stored Markdown body to HTML for the editor.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut stash = Stash::default();

    let text = EMBED_BLOCK
        .replace_all(markdown, |caps: &Captures| {
            let div = format!(r#"<div class="{EMBED_CLASS}">{}</div>"#, &caps[1]);
            format!("\n\n{}\n\n", stash.put(div))
        })
        .into_owned();

    let mut writer = HtmlWriter {
        out: String::with_capacity(text.len() * 2),
        open: None,
        stash: &mut stash,
    };

    for raw in text.lines() {
        if let Some(Block::Code(lines)) = &mut writer.open {
            if raw.trim_start().starts_with("```") {
                writer.flush();
            } else {
                lines.push(raw.to_string());
            }
            continue;
        }

        let line = raw.trim();
        if line.is_empty() {
            writer.flush();
        } else if line.starts_with("```") {
            writer.flush();
            writer.open = Some(Block::Code(Vec::new()));
        } else if Stash::is_token(line) {
            writer.emit(line);
        } else if let Some(caps) = MD_HEADING.captures(line) {
            let level = caps[1].len();
            let inner = inline_to_html(caps[2].trim(), writer.stash);
            writer.emit(&format!("<h{level}>{inner}</h{level}>"));
        } else if MD_RULE.is_match(line) {
            writer.emit("<hr>");
        } else if let Some(quoted) = line.strip_prefix('>') {
            writer.push_quote(quoted.trim_start());
        } else if let Some(caps) = MD_BULLET.captures(line) {
            writer.push_item(false, &caps[1]);
        } else if let Some(caps) = MD_NUMBERED.captures(line) {
            writer.push_item(true, &caps[1]);
        } else {
            writer.push_line(line);
        }
    }
    writer.flush();

    let html = writer.out;
    stash.restore(&html)
}

fn inline_to_html(text: &str, stash: &mut Stash) -> String {
    let text = MD_CODE_SPAN.replace_all(text, |caps: &Captures| {
        stash.put(format!("<code>{}</code>", escape_html(&caps[1])))
    });
    let mut text = escape_html(&text);

    text = MD_IMAGE
        .replace_all(&text, |caps: &Captures| {
            stash.put(format!(r#"<img src="{}" alt="{}">"#, &caps[2], &caps[1]))
        })
        .into_owned();

    text = MD_LINK
        .replace_all(&text, |caps: &Captures| {
            let open = stash.put(format!(r#"<a href="{}">"#, &caps[2]));
            format!("{open}{}</a>", &caps[1])
        })
        .into_owned();

    for (re, tag) in MD_INLINE.iter() {
        text = re
            .replace_all(&text, |caps: &Captures| format!("<{tag}>{}</{tag}>", &caps[1]))
            .into_owned();
    }

    text
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Visible text of an HTML (or Markdown-with-HTML) fragment, whitespace
/// collapsed. Scripts and styles are dropped; tags become word breaks.
pub fn plain_text(html: &str) -> String {
    let text = HTML_SCRIPT.replace_all(html, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    single_line(&decode_entities(&text))
}
