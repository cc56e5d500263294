//! Markdown rendering for post bodies.

mod markdown;

pub use markdown::{derive_excerpt, render_markdown, EXCERPT_MAX_CHARS};
