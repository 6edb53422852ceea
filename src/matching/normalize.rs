//! Canonicalization of track identities for fuzzy matching.
//!
//! Catalog tags and scrobble exports disagree on punctuation, casing,
//! accents and leading track numbers. Both sides are reduced to the same
//! key with the functions here.

use regex::Regex;
use std::sync::OnceLock;

/// One or two ASCII digits followed by a hyphen or space, at the very start.
static TRACK_NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn track_number_regex() -> &'static Regex {
    TRACK_NUMBER_PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{1,2}[- ]").expect("Invalid track number regex pattern"))
}

/// Strips a leading track-number token from a title.
///
/// `"12 - Song Title"` and `"07-Song Title"` both become `"Song Title"`.
/// Titles without the prefix are returned as is; a title that is nothing but
/// the prefix becomes empty.
pub fn normalize_title(title: &str) -> &str {
    match track_number_regex().find(title) {
        Some(prefix) => title[prefix.end()..].trim_start_matches(|c: char| c == '-' || c.is_whitespace()),
        None => title,
    }
}

fn is_ignored(c: char) -> bool {
    matches!(
        c,
        '\'' | '\u{2018}' | '\u{2019}' | '?' | ',' | '-' | '!' | '.' | '`'
    ) || c.is_whitespace()
}

fn strip_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' => 'u',
        other => other,
    }
}

/// Reduces free text to its matchable form.
///
/// Punctuation and whitespace are dropped, `&` becomes `and`, `Thirty`
/// becomes `30` (case-sensitive, so it runs before lowercasing), five
/// accented vowels lose their accent, and anything from the first `(`
/// onwards is cut. The result is a fixed point: canonicalizing it again
/// returns it unchanged.
pub fn canonicalize(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => stripped.push_str("and"),
            c if is_ignored(c) => {}
            c => stripped.push(c),
        }
    }

    let lowered = stripped.replace("Thirty", "30").to_lowercase();
    let mut key: String = lowered.chars().map(strip_accent).collect();

    if let Some(paren) = key.find('(') {
        key.truncate(paren);
    }
    key
}
