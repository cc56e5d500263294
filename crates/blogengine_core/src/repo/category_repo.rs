//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - Name and slug are each unique across categories (name case-insensitive).
//! - Deleting a category clears `category_id` on its posts; posts survive.

use crate::model::category::{Category, CategoryChanges, CategoryDraft, CategoryId};
use crate::repo::store::SqliteContentStore;
use crate::repo::term_sql::{self, TermRow, CATEGORIES};
use crate::repo::RepoResult;

/// Repository interface for category CRUD.
pub trait CategoryRepository {
    fn create_category(&mut self, draft: &CategoryDraft) -> RepoResult<CategoryId>;
    fn update_category(&mut self, id: CategoryId, changes: &CategoryChanges) -> RepoResult<()>;
    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    /// All categories sorted by name.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

impl CategoryRepository for SqliteContentStore<'_> {
    fn create_category(&mut self, draft: &CategoryDraft) -> RepoResult<CategoryId> {
        term_sql::insert_term(self.conn, CATEGORIES, draft)
    }

    fn update_category(&mut self, id: CategoryId, changes: &CategoryChanges) -> RepoResult<()> {
        term_sql::update_term(self.conn, CATEGORIES, id, changes)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        term_sql::delete_term(self.conn, CATEGORIES, id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(term_sql::select_term_by_id(self.conn, CATEGORIES, id)?.map(into_category))
    }

    fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        Ok(term_sql::select_term_by_slug(self.conn, CATEGORIES, slug)?.map(into_category))
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(term_sql::select_terms(self.conn, CATEGORIES)?
            .into_iter()
            .map(into_category)
            .collect())
    }
}

fn into_category(row: TermRow) -> Category {
    Category {
        id: row.id,
        name: row.name,
        description: row.description,
        slug: row.slug,
    }
}
