//! Tag repository contract and SQLite implementation.
//!
//! # Invariants
//! - Name and slug are each unique across tags (name case-insensitive).
//! - Deleting a tag drops its `post_tags` rows; posts survive.

use crate::model::post::PostId;
use crate::model::tag::{Tag, TagChanges, TagDraft, TagId};
use crate::repo::store::SqliteContentStore;
use crate::repo::term_sql::{self, TermRow, TAGS};
use crate::repo::RepoResult;

/// Repository interface for tag CRUD and post-tag lookups.
pub trait TagRepository {
    fn create_tag(&mut self, draft: &TagDraft) -> RepoResult<TagId>;
    fn update_tag(&mut self, id: TagId, changes: &TagChanges) -> RepoResult<()>;
    fn delete_tag(&mut self, id: TagId) -> RepoResult<()>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn get_tag_by_slug(&self, slug: &str) -> RepoResult<Option<Tag>>;
    /// All tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Tags attached to one post, sorted by name.
    fn list_tags_for_post(&self, post_id: PostId) -> RepoResult<Vec<Tag>>;
}

impl TagRepository for SqliteContentStore<'_> {
    fn create_tag(&mut self, draft: &TagDraft) -> RepoResult<TagId> {
        term_sql::insert_term(self.conn, TAGS, draft)
    }

    fn update_tag(&mut self, id: TagId, changes: &TagChanges) -> RepoResult<()> {
        term_sql::update_term(self.conn, TAGS, id, changes)
    }

    fn delete_tag(&mut self, id: TagId) -> RepoResult<()> {
        term_sql::delete_term(self.conn, TAGS, id)
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        Ok(term_sql::select_term_by_id(self.conn, TAGS, id)?.map(into_tag))
    }

    fn get_tag_by_slug(&self, slug: &str) -> RepoResult<Option<Tag>> {
        Ok(term_sql::select_term_by_slug(self.conn, TAGS, slug)?.map(into_tag))
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        Ok(term_sql::select_terms(self.conn, TAGS)?
            .into_iter()
            .map(into_tag)
            .collect())
    }

    fn list_tags_for_post(&self, post_id: PostId) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.description, t.slug
             FROM post_tags pt
             INNER JOIN tags t ON t.id = pt.tag_id
             WHERE pt.post_id = ?1
             ORDER BY t.name COLLATE NOCASE ASC, t.id ASC;",
        )?;
        let tags = stmt
            .query_map([post_id], |row| {
                Ok(Tag {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    description: row.get("description")?,
                    slug: row.get("slug")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

fn into_tag(row: TermRow) -> Tag {
    Tag {
        id: row.id,
        name: row.name,
        description: row.description,
        slug: row.slug,
    }
}
