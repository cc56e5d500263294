//! Slug derivation and format checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum slug length accepted by the store.
pub const SLUG_MAX_CHARS: usize = 40;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Derives a URL-safe slug from free text.
///
/// Output is lowercase ASCII joined by hyphens and capped at
/// [`SLUG_MAX_CHARS`] without a trailing hyphen. May be empty when the input
/// has no transliterable characters.
pub fn slugify(value: &str) -> String {
    let full = ::slug::slugify(value);
    let capped: String = full.chars().take(SLUG_MAX_CHARS).collect();
    capped.trim_end_matches('-').to_string()
}

/// Returns whether `value` is an acceptable stored slug.
pub fn is_valid_slug(value: &str) -> bool {
    value.chars().count() <= SLUG_MAX_CHARS && SLUG_RE.is_match(value)
}
