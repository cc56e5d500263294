//! Post aggregate.
//!
//! # Responsibility
//! - Define the stored post record, its create/update inputs and the read
//!   model served to public pages.
//! - Normalize titles and slugs before they reach storage.
//!
//! # Invariants
//! - `slug` is unique across posts and prepopulated from `title` when blank.
//! - `tag_ids` is a set; duplicates collapse on input.
//! - `pub_date` is Unix epoch milliseconds (UTC).

use super::category::{Category, CategoryId};
use super::slug::{is_valid_slug, slugify, SLUG_MAX_CHARS};
use super::tag::{Tag, TagId};
use super::validation::{required_text, ValidationError, TITLE_MAX_CHARS};
use super::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type PostId = i64;
pub type SiteId = i64;
pub type AuthorId = i64;

/// Site assigned to posts created without an explicit one.
pub const DEFAULT_SITE_ID: SiteId = 1;

/// Stored post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Markdown body.
    pub text: String,
    pub slug: String,
    pub pub_date: i64,
    pub site_id: SiteId,
    pub author_id: AuthorId,
    pub category_id: Option<CategoryId>,
    pub tag_ids: BTreeSet<TagId>,
}

impl Post {
    /// Publish timestamp as a UTC datetime, `None` when out of chrono's range.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.pub_date)
    }

    /// Merges `changes` onto this record. Fields left as `None` are kept.
    pub fn apply(&mut self, changes: &PostChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(text) = &changes.text {
            self.text = text.clone();
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(pub_date) = changes.pub_date {
            self.pub_date = pub_date;
        }
        if let Some(site_id) = changes.site_id {
            self.site_id = site_id;
        }
        if let Some(author_id) = changes.author_id {
            self.author_id = author_id;
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(tag_ids) = &changes.tag_ids {
            self.tag_ids = tag_ids.clone();
        }
    }

    /// Trims title/slug, fills a blank slug from the title and checks limits.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        self.title = required_text(EntityKind::Post, "title", &self.title, TITLE_MAX_CHARS)?;

        let slug = match self.slug.trim() {
            "" => slugify(&self.title),
            explicit => explicit.to_string(),
        };
        if slug.is_empty() {
            return Err(ValidationError::Required {
                entity: EntityKind::Post,
                field: "slug",
            });
        }
        if slug.chars().count() > SLUG_MAX_CHARS {
            return Err(ValidationError::TooLong {
                entity: EntityKind::Post,
                field: "slug",
                max_chars: SLUG_MAX_CHARS,
            });
        }
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug {
                entity: EntityKind::Post,
                slug,
            });
        }
        self.slug = slug;
        Ok(())
    }
}

/// Create input for a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    /// Blank or `None` prepopulates from `title`.
    pub slug: Option<String>,
    pub pub_date: i64,
    pub site_id: SiteId,
    pub author_id: AuthorId,
    pub category_id: Option<CategoryId>,
    pub tag_ids: BTreeSet<TagId>,
}

impl PostDraft {
    /// Creates a draft on the default site with no category and no tags.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        pub_date: i64,
        author_id: AuthorId,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
            pub_date,
            site_id: DEFAULT_SITE_ID,
            author_id,
            category_id: None,
            tag_ids: BTreeSet::new(),
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    /// Builds the normalized record this draft would store, with `id = 0`.
    pub fn to_post(&self) -> Result<Post, ValidationError> {
        let mut post = Post {
            id: 0,
            title: self.title.clone(),
            text: self.text.clone(),
            slug: self.slug.clone().unwrap_or_default(),
            pub_date: self.pub_date,
            site_id: self.site_id,
            author_id: self.author_id,
            category_id: self.category_id,
            tag_ids: self.tag_ids.clone(),
        };
        post.normalize()?;
        Ok(post)
    }
}

/// Partial post update. `None` keeps the stored value.
///
/// `category_id: Some(None)` clears the category; `slug: Some("")` re-derives
/// the slug from the (possibly new) title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub text: Option<String>,
    pub slug: Option<String>,
    pub pub_date: Option<i64>,
    pub site_id: Option<SiteId>,
    pub author_id: Option<AuthorId>,
    pub category_id: Option<Option<CategoryId>>,
    pub tag_ids: Option<BTreeSet<TagId>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Post with its category and tags resolved, as shown on public pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<Category>,
    /// Sorted by name.
    pub tags: Vec<Tag>,
}
