//! Template-facing projections of posts, categories and tags.

use blogengine_core::{derive_excerpt, render_markdown, Category, PostEntry, Tag};
use serde::Serialize;

const DATE_FORMAT: &str = "%B %-d, %Y %H:%M";

/// Link to a category or tag listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub name: String,
    pub slug: String,
    pub url: String,
}

impl LinkView {
    fn category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            url: format!("/category/{}/", category.slug),
        }
    }

    fn tag(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            url: format!("/tag/{}/", tag.slug),
        }
    }
}

/// Post ready for rendering: body converted to HTML, date formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub title: String,
    pub slug: String,
    pub url: String,
    pub html: String,
    pub excerpt: Option<String>,
    pub pub_date: String,
    pub category: Option<LinkView>,
    pub tags: Vec<LinkView>,
}

impl From<&PostEntry> for PostView {
    fn from(entry: &PostEntry) -> Self {
        let post = &entry.post;
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            url: format!("/post/{}/", post.slug),
            html: render_markdown(&post.text),
            excerpt: derive_excerpt(&post.text),
            pub_date: post
                .published_at()
                .map(|at| at.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            category: entry.category.as_ref().map(LinkView::category),
            tags: entry.tags.iter().map(LinkView::tag).collect(),
        }
    }
}

pub(crate) fn post_views(entries: &[PostEntry]) -> Vec<PostView> {
    entries.iter().map(PostView::from).collect()
}
