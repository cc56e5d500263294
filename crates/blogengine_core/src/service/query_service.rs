//! Public read paths.
//!
//! # Responsibility
//! - Serve the listings and lookups behind the visitor-facing pages.
//! - Resolve each post's category and tags into a [`PostEntry`].
//!
//! # Invariants
//! - Every method is read-only.
//! - Listings are ordered `pub_date DESC, id ASC`.
//! - Unknown category/tag slugs yield empty lists, not errors.

use crate::model::category::Category;
use crate::model::post::{Post, PostEntry};
use crate::model::tag::Tag;
use crate::model::EntityKind;
use crate::repo::{ContentStore, PostListQuery, RepoError, RepoResult};

const PAGE_DEFAULT_LIMIT: u32 = 10;
const PAGE_LIMIT_MAX: u32 = 50;

/// One page of recent posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub items: Vec<PostEntry>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
    /// Whether rows exist past this page.
    pub has_more: bool,
}

/// Read-only query facade over a [`ContentStore`].
pub struct QueryService<S: ContentStore> {
    store: S,
}

impl<S: ContentStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Newest `limit` posts.
    pub fn list_recent(&self, limit: u32) -> RepoResult<Vec<PostEntry>> {
        self.list(PostListQuery {
            limit: Some(limit),
            ..PostListQuery::default()
        })
    }

    /// Paginated recent posts. Limit defaults to 10 and clamps to 50.
    pub fn list_page(&self, limit: Option<u32>, offset: u32) -> RepoResult<PostPage> {
        let applied_limit = normalize_page_limit(limit);
        let mut items = self.list(PostListQuery {
            limit: Some(applied_limit + 1),
            offset,
            ..PostListQuery::default()
        })?;
        let has_more = items.len() > applied_limit as usize;
        items.truncate(applied_limit as usize);
        Ok(PostPage {
            items,
            applied_limit,
            has_more,
        })
    }

    pub fn get_by_slug(&self, slug: &str) -> RepoResult<PostEntry> {
        let post = self
            .store
            .get_post_by_slug(slug)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Post, slug))?;
        self.resolve(post)
    }

    pub fn list_by_category(&self, category_slug: &str) -> RepoResult<Vec<PostEntry>> {
        self.list(PostListQuery {
            category_slug: Some(category_slug.to_string()),
            ..PostListQuery::default()
        })
    }

    pub fn list_by_tag(&self, tag_slug: &str) -> RepoResult<Vec<PostEntry>> {
        self.list(PostListQuery {
            tag_slug: Some(tag_slug.to_string()),
            ..PostListQuery::default()
        })
    }

    /// Category behind a listing slug, if any.
    pub fn category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        self.store.get_category_by_slug(slug)
    }

    pub fn tag_by_slug(&self, slug: &str) -> RepoResult<Option<Tag>> {
        self.store.get_tag_by_slug(slug)
    }

    fn list(&self, query: PostListQuery) -> RepoResult<Vec<PostEntry>> {
        self.store
            .list_posts(&query)?
            .into_iter()
            .map(|post| self.resolve(post))
            .collect()
    }

    fn resolve(&self, post: Post) -> RepoResult<PostEntry> {
        let category = match post.category_id {
            Some(id) => self.store.get_category(id)?,
            None => None,
        };
        let tags = self.store.list_tags_for_post(post.id)?;
        Ok(PostEntry {
            post,
            category,
            tags,
        })
    }
}

/// Normalizes a page size: `None`/0 fall back to 10, larger values cap at 50.
pub fn normalize_page_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => PAGE_DEFAULT_LIMIT,
        Some(value) => value.min(PAGE_LIMIT_MAX),
    }
}
