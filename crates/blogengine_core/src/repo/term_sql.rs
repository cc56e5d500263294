//! SQL shared by the `categories` and `tags` tables, which have one shape.

use crate::model::term::{TermChanges, TermDraft, TermFields};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TermTable {
    pub entity: EntityKind,
    pub table: &'static str,
}

pub(crate) const CATEGORIES: TermTable = TermTable {
    entity: EntityKind::Category,
    table: "categories",
};

pub(crate) const TAGS: TermTable = TermTable {
    entity: EntityKind::Tag,
    table: "tags",
};

#[derive(Debug, Clone)]
pub(crate) struct TermRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
}

pub(crate) fn insert_term(
    conn: &mut Connection,
    table: TermTable,
    draft: &TermDraft,
) -> RepoResult<i64> {
    let fields = draft.validate(table.entity)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    ensure_term_unique(&tx, table, &fields, None)?;
    tx.execute(
        &format!(
            "INSERT INTO {} (name, description, slug) VALUES (?1, ?2, ?3);",
            table.table
        ),
        params![fields.name, fields.description, fields.slug],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

pub(crate) fn update_term(
    conn: &mut Connection,
    table: TermTable,
    id: i64,
    changes: &TermChanges,
) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current =
        select_term_by_id(&tx, table, id)?.ok_or_else(|| RepoError::not_found(table.entity, id))?;

    let merged = TermDraft {
        name: changes.name.clone().unwrap_or(current.name),
        description: changes.description.clone().unwrap_or(current.description),
    };
    let fields = merged.validate(table.entity)?;
    ensure_term_unique(&tx, table, &fields, Some(id))?;

    tx.execute(
        &format!(
            "UPDATE {} SET name = ?1, description = ?2, slug = ?3 WHERE id = ?4;",
            table.table
        ),
        params![fields.name, fields.description, fields.slug, id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Deletes one row. Referencing posts are handled by the schema's
/// `ON DELETE` rules.
pub(crate) fn delete_term(conn: &mut Connection, table: TermTable, id: i64) -> RepoResult<()> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", table.table),
        [id],
    )?;
    if changed == 0 {
        return Err(RepoError::not_found(table.entity, id));
    }
    Ok(())
}

pub(crate) fn select_term_by_id(
    conn: &Connection,
    table: TermTable,
    id: i64,
) -> RepoResult<Option<TermRow>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT id, name, description, slug FROM {} WHERE id = ?1;",
                table.table
            ),
            [id],
            parse_term_row,
        )
        .optional()?;
    Ok(row)
}

pub(crate) fn select_term_by_slug(
    conn: &Connection,
    table: TermTable,
    slug: &str,
) -> RepoResult<Option<TermRow>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT id, name, description, slug FROM {} WHERE slug = ?1;",
                table.table
            ),
            [slug.trim()],
            parse_term_row,
        )
        .optional()?;
    Ok(row)
}

pub(crate) fn select_terms(conn: &Connection, table: TermTable) -> RepoResult<Vec<TermRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, description, slug FROM {} ORDER BY name COLLATE NOCASE ASC, id ASC;",
        table.table
    ))?;
    let rows = stmt
        .query_map([], parse_term_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn ensure_term_unique(
    conn: &Connection,
    table: TermTable,
    fields: &TermFields,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    let clash: Option<(String, String)> = conn
        .query_row(
            &format!(
                "SELECT name, slug
                 FROM {}
                 WHERE (slug = ?1 OR name = ?2 COLLATE NOCASE)
                   AND (?3 IS NULL OR id <> ?3)
                 LIMIT 1;",
                table.table
            ),
            params![fields.slug, fields.name, exclude_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match clash {
        None => Ok(()),
        Some((name, _)) if name.eq_ignore_ascii_case(&fields.name) => {
            Err(ValidationError::NameTaken {
                entity: table.entity,
                name: fields.name.clone(),
            }
            .into())
        }
        Some(_) => Err(ValidationError::SlugTaken {
            entity: table.entity,
            slug: fields.slug.clone(),
        }
        .into()),
    }
}

fn parse_term_row(row: &Row<'_>) -> rusqlite::Result<TermRow> {
    Ok(TermRow {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        slug: row.get("slug")?,
    })
}
