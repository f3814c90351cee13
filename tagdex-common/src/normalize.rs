//! Tag normalization
//!
//! Tags are stored in one canonical form so the same label always maps to
//! the same association row: lowercase, single-spaced, free of control
//! characters, at most [`MAX_TAG_CHARS`] characters.

/// Maximum length of a stored tag, in characters
pub const MAX_TAG_CHARS: usize = 40;

/// ASCII control characters that are removed outright.
///
/// Whitespace-class controls (tab, newline, CR) are kept here and handled
/// by whitespace collapsing instead, so they still separate words.
fn is_stripped_control(c: char) -> bool {
    c.is_ascii_control() && !c.is_whitespace()
}

/// Normalize a free-text tag into its canonical stored form.
///
/// Strips non-whitespace control characters character-by-character,
/// lowercases, trims outer whitespace, collapses internal whitespace runs
/// to a single space, and truncates to [`MAX_TAG_CHARS`] characters.
///
/// The transform is idempotent: `normalize_tag(&normalize_tag(x))` equals
/// `normalize_tag(x)` for every input. Empty output means the input had
/// no usable content; callers must reject it before persistence.
pub fn normalize_tag(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|&c| !is_stripped_control(c)).collect();
    let collapsed = stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let truncated: String = collapsed.chars().take(MAX_TAG_CHARS).collect();
    // Truncation can land on a word boundary and leave a trailing space
    truncated.trim_end().to_string()
}
