//! Markdown to HTML conversion and plain-text excerpts.
//!
//! # Invariants
//! - `render_markdown` never fails; malformed markup renders as text.
//! - Excerpts never contain Markdown symbols or line breaks.

use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

/// Excerpts are cut to this many characters.
pub const EXCERPT_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Renders a post body to HTML.
///
/// Tables, footnotes, strikethrough and task lists are enabled on top of
/// CommonMark.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Derives a plain-text summary of a post body.
///
/// Images are dropped, links keep their label, Markdown symbols are stripped
/// and whitespace collapsed; the first [`EXCERPT_MAX_CHARS`] characters are
/// kept. Returns `None` when nothing readable remains.
pub fn derive_excerpt(markdown: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(markdown, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(EXCERPT_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::{derive_excerpt, render_markdown};

    #[test]
    fn links_become_anchor_tags() {
        let html = render_markdown("This is my [first blog post](http://127.0.0.1:8000/)");
        assert!(html.contains(r#"<a href="http://127.0.0.1:8000/">first blog post</a>"#));
    }

    #[test]
    fn headings_and_emphasis_are_rendered() {
        let html = render_markdown("# Title\n\nSome *emphasis* and **strong** text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<strong>strong</strong>"));
    }

    #[test]
    fn excerpt_keeps_link_labels_and_drops_images() {
        let excerpt =
            derive_excerpt("# Hello\n\n![cover](a.png) Read [the docs](https://x.y) **now**")
                .unwrap();
        assert_eq!(excerpt, "Hello Read the docs now");
    }

    #[test]
    fn excerpt_is_capped_and_empty_bodies_have_none() {
        let long = "word ".repeat(60);
        assert_eq!(derive_excerpt(&long).unwrap().chars().count(), 100);
        assert_eq!(derive_excerpt("  ** ## "), None);
    }
}
