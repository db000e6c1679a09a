//! Slug rules: deriving filename keys from titles and checking caller-supplied ones.

/// Derive a slug from a title.
///
/// Lowercases, drops anything that is not an ASCII word character, whitespace or
/// hyphen, then collapses runs of whitespace, underscores and hyphens into a
/// single hyphen and trims hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_dash = true;
        }
        // Everything else is removed without acting as a separator.
    }

    slug
}

/// A slug as `save` will write it: lowercase ASCII alphanumerics separated by
/// single hyphens.
pub fn is_canonical(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// A slug that is safe to turn into a file name inside the content directory.
///
/// Looser than [`is_canonical`] so hand-written files such as `My_Post.md` can
/// still be loaded and deleted.
pub fn is_safe_key(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && slug
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
