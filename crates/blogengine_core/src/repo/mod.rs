//! Content store: repository contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define CRUD contracts for categories, tags and posts.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Writes validate input before touching SQL and run in one `IMMEDIATE`
//!   transaction, so uniqueness checks cannot race the write.
//! - Repository reads return `Ok(None)` for absent rows; services turn that
//!   into `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod post_repo;
pub mod store;
pub mod tag_repo;
mod term_sql;

pub use category_repo::CategoryRepository;
pub use post_repo::{PostListQuery, PostRepository};
pub use store::SqliteContentStore;
pub use tag_repo::TagRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for content store persistence and lookup operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before any write happened.
    Validation(ValidationError),
    /// No record with the given id or slug.
    NotFound { entity: EntityKind, key: String },
    Db(DbError),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::Db(_) => "db_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Everything the admin site and services need from storage.
pub trait ContentStore: CategoryRepository + TagRepository + PostRepository {}

impl<T> ContentStore for T where T: CategoryRepository + TagRepository + PostRepository + ?Sized {}
