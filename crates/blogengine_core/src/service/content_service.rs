//! Content store use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/get/list for categories, tags and posts
//!   with not-found semantics on every lookup.
//! - Emit one metadata-only log event per write.
//!
//! # Invariants
//! - Writes return the record as read back from storage.
//! - Failed writes leave storage untouched (repositories are transactional).

use crate::model::category::{Category, CategoryChanges, CategoryDraft, CategoryId};
use crate::model::post::{Post, PostChanges, PostDraft, PostId};
use crate::model::tag::{Tag, TagChanges, TagDraft, TagId};
use crate::model::EntityKind;
use crate::repo::{ContentStore, PostListQuery, RepoError, RepoResult};
use log::{info, warn};

/// CRUD facade over a [`ContentStore`].
pub struct ContentService<S: ContentStore> {
    store: S,
}

impl<S: ContentStore> ContentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_category(&mut self, draft: &CategoryDraft) -> RepoResult<Category> {
        let result = self.store.create_category(draft);
        let id = finish("category_create", result.as_ref().ok().copied(), result)?;
        read_back(EntityKind::Category, id, self.store.get_category(id))
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> RepoResult<Category> {
        let result = self.store.update_category(id, changes);
        finish("category_update", Some(id), result)?;
        read_back(EntityKind::Category, id, self.store.get_category(id))
    }

    /// Deletes a category; its posts stay, with no category.
    pub fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        let result = self.store.delete_category(id);
        finish("category_delete", Some(id), result)
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        self.store
            .get_category(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, id))
    }

    pub fn get_category_by_slug(&self, slug: &str) -> RepoResult<Category> {
        self.store
            .get_category_by_slug(slug)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Category, slug))
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.store.list_categories()
    }

    pub fn create_tag(&mut self, draft: &TagDraft) -> RepoResult<Tag> {
        let result = self.store.create_tag(draft);
        let id = finish("tag_create", result.as_ref().ok().copied(), result)?;
        read_back(EntityKind::Tag, id, self.store.get_tag(id))
    }

    pub fn update_tag(&mut self, id: TagId, changes: &TagChanges) -> RepoResult<Tag> {
        let result = self.store.update_tag(id, changes);
        finish("tag_update", Some(id), result)?;
        read_back(EntityKind::Tag, id, self.store.get_tag(id))
    }

    /// Deletes a tag and detaches it from every post.
    pub fn delete_tag(&mut self, id: TagId) -> RepoResult<()> {
        let result = self.store.delete_tag(id);
        finish("tag_delete", Some(id), result)
    }

    pub fn get_tag(&self, id: TagId) -> RepoResult<Tag> {
        self.store
            .get_tag(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Tag, id))
    }

    pub fn get_tag_by_slug(&self, slug: &str) -> RepoResult<Tag> {
        self.store
            .get_tag_by_slug(slug)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Tag, slug))
    }

    pub fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        self.store.list_tags()
    }

    pub fn create_post(&mut self, draft: &PostDraft) -> RepoResult<Post> {
        let result = self.store.create_post(draft);
        let id = finish("post_create", result.as_ref().ok().copied(), result)?;
        read_back(EntityKind::Post, id, self.store.get_post(id))
    }

    /// Merges `changes` onto the stored post; untouched fields keep their values.
    pub fn update_post(&mut self, id: PostId, changes: &PostChanges) -> RepoResult<Post> {
        let result = self.store.update_post(id, changes);
        finish("post_update", Some(id), result)?;
        read_back(EntityKind::Post, id, self.store.get_post(id))
    }

    pub fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        let result = self.store.delete_post(id);
        finish("post_delete", Some(id), result)
    }

    pub fn get_post(&self, id: PostId) -> RepoResult<Post> {
        self.store
            .get_post(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Post, id))
    }

    pub fn get_post_by_slug(&self, slug: &str) -> RepoResult<Post> {
        self.store
            .get_post_by_slug(slug)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Post, slug))
    }

    /// Every post, newest first.
    pub fn list_posts(&self) -> RepoResult<Vec<Post>> {
        self.store.list_posts(&PostListQuery::default())
    }
}

fn finish<T>(event: &'static str, id: Option<i64>, result: RepoResult<T>) -> RepoResult<T> {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match &result {
        Ok(_) => info!("event={event} module=service status=ok id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error id={id} error_code={}",
            err.code()
        ),
    }
    result
}

fn read_back<T>(entity: EntityKind, id: i64, loaded: RepoResult<Option<T>>) -> RepoResult<T> {
    loaded?.ok_or_else(|| {
        RepoError::InvalidData(format!("{entity} {id} missing in read-back after write"))
    })
}
