//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist posts and their `post_tags` join rows.
//! - Serve the ordered listings behind the public pages.
//!
//! # Invariants
//! - Listing order is always `pub_date DESC, id ASC`.
//! - A post's tag set is replaced wholesale inside the post's write
//!   transaction; join rows never outlive the post.
//! - Category and tag references are checked before the write.

use crate::model::category::CategoryId;
use crate::model::post::{Post, PostChanges, PostDraft, PostId};
use crate::model::tag::TagId;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::store::SqliteContentStore;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const POST_SELECT_SQL: &str = "SELECT
    p.id,
    p.title,
    p.text,
    p.slug,
    p.pub_date,
    p.site_id,
    p.author_id,
    p.category_id
FROM posts p";

/// Filter and pagination options for post listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Only posts in the category with this slug.
    pub category_slug: Option<String>,
    /// Only posts carrying the tag with this slug.
    pub tag_slug: Option<String>,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for post CRUD and listings.
pub trait PostRepository {
    fn create_post(&mut self, draft: &PostDraft) -> RepoResult<PostId>;
    fn update_post(&mut self, id: PostId, changes: &PostChanges) -> RepoResult<()>;
    fn delete_post(&mut self, id: PostId) -> RepoResult<()>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn get_post_by_slug(&self, slug: &str) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
}

impl PostRepository for SqliteContentStore<'_> {
    fn create_post(&mut self, draft: &PostDraft) -> RepoResult<PostId> {
        let post = draft.to_post()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_slug_free(&tx, &post.slug, None)?;
        ensure_references_exist(&tx, post.category_id, &post.tag_ids)?;

        tx.execute(
            "INSERT INTO posts (
                title,
                text,
                slug,
                pub_date,
                site_id,
                author_id,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                post.title,
                post.text,
                post.slug,
                post.pub_date,
                post.site_id,
                post.author_id,
                post.category_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        replace_post_tags(&tx, id, &post.tag_ids)?;
        tx.commit()?;

        Ok(id)
    }

    fn update_post(&mut self, id: PostId, changes: &PostChanges) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut post =
            select_post_by_id(&tx, id)?.ok_or_else(|| RepoError::not_found(EntityKind::Post, id))?;

        post.apply(changes);
        post.normalize()?;
        ensure_slug_free(&tx, &post.slug, Some(id))?;
        ensure_references_exist(&tx, post.category_id, &post.tag_ids)?;

        tx.execute(
            "UPDATE posts
             SET
                title = ?1,
                text = ?2,
                slug = ?3,
                pub_date = ?4,
                site_id = ?5,
                author_id = ?6,
                category_id = ?7
             WHERE id = ?8;",
            params![
                post.title,
                post.text,
                post.slug,
                post.pub_date,
                post.site_id,
                post.author_id,
                post.category_id,
                id,
            ],
        )?;
        if changes.tag_ids.is_some() {
            replace_post_tags(&tx, id, &post.tag_ids)?;
        }
        tx.commit()?;

        Ok(())
    }

    fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Post, id));
        }
        Ok(())
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        select_post_by_id(self.conn, id)
    }

    fn get_post_by_slug(&self, slug: &str) -> RepoResult<Option<Post>> {
        let row = self
            .conn
            .query_row(
                &format!("{POST_SELECT_SQL} WHERE p.slug = ?1;"),
                [slug.trim()],
                parse_post_row,
            )
            .optional()?;
        match row {
            Some(mut post) => {
                post.tag_ids = load_tag_ids(self.conn, post.id)?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_slug) = query.category_slug.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM categories c
                    WHERE c.id = p.category_id
                      AND c.slug = ?
                )",
            );
            bind_values.push(Value::Text(category_slug.trim().to_string()));
        }

        if let Some(tag_slug) = query.tag_slug.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM post_tags pt
                    INNER JOIN tags t ON t.id = pt.tag_id
                    WHERE pt.post_id = p.id
                      AND t.slug = ?
                )",
            );
            bind_values.push(Value::Text(tag_slug.trim().to_string()));
        }

        sql.push_str(" ORDER BY p.pub_date DESC, p.id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            let mut post = parse_post_row(row)?;
            post.tag_ids = load_tag_ids(self.conn, post.id)?;
            posts.push(post);
        }

        Ok(posts)
    }
}

fn select_post_by_id(conn: &Connection, id: PostId) -> RepoResult<Option<Post>> {
    let row = conn
        .query_row(
            &format!("{POST_SELECT_SQL} WHERE p.id = ?1;"),
            [id],
            parse_post_row,
        )
        .optional()?;
    match row {
        Some(mut post) => {
            post.tag_ids = load_tag_ids(conn, post.id)?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        pub_date: row.get("pub_date")?,
        site_id: row.get("site_id")?,
        author_id: row.get("author_id")?,
        category_id: row.get("category_id")?,
        tag_ids: BTreeSet::new(),
    })
}

fn load_tag_ids(conn: &Connection, post_id: PostId) -> RepoResult<BTreeSet<TagId>> {
    let mut stmt = conn.prepare("SELECT tag_id FROM post_tags WHERE post_id = ?1;")?;
    let ids = stmt
        .query_map([post_id], |row| row.get::<_, TagId>(0))?
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids)
}

fn replace_post_tags(conn: &Connection, post_id: PostId, tag_ids: &BTreeSet<TagId>) -> RepoResult<()> {
    conn.execute("DELETE FROM post_tags WHERE post_id = ?1;", [post_id])?;
    for tag_id in tag_ids {
        conn.execute(
            "INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2);",
            params![post_id, tag_id],
        )?;
    }
    Ok(())
}

fn ensure_slug_free(conn: &Connection, slug: &str, exclude_id: Option<PostId>) -> RepoResult<()> {
    let taken: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM posts
            WHERE slug = ?1
              AND (?2 IS NULL OR id <> ?2)
        );",
        params![slug, exclude_id],
        |row| row.get(0),
    )?;
    if taken == 1 {
        return Err(ValidationError::SlugTaken {
            entity: EntityKind::Post,
            slug: slug.to_string(),
        }
        .into());
    }
    Ok(())
}

fn ensure_references_exist(
    conn: &Connection,
    category_id: Option<CategoryId>,
    tag_ids: &BTreeSet<TagId>,
) -> RepoResult<()> {
    if let Some(category_id) = category_id {
        if !row_exists(conn, "categories", category_id)? {
            return Err(ValidationError::UnknownCategory(category_id).into());
        }
    }
    for &tag_id in tag_ids {
        if !row_exists(conn, "tags", tag_id)? {
            return Err(ValidationError::UnknownTag(tag_id).into());
        }
    }
    Ok(())
}

fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
