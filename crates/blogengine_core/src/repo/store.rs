//! SQLite handle shared by the category, tag and post repositories.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::repo::RepoResult;
use rusqlite::Connection;

/// SQLite-backed content store.
///
/// Holds the connection mutably because every write opens its own
/// transaction.
pub struct SqliteContentStore<'conn> {
    pub(crate) conn: &'conn mut Connection,
}

impl<'conn> SqliteContentStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `DbError::UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            }
            .into());
        }
        Ok(Self { conn })
    }
}
