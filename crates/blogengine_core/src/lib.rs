//! Core domain logic for the blog engine.
//! This crate is the single source of truth for content invariants.

pub mod admin;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use admin::{AdminAction, AdminError, AdminForm, AdminOutcome, AdminSite, FieldErrors};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryChanges, CategoryDraft, CategoryId};
pub use model::post::{Post, PostChanges, PostDraft, PostEntry, PostId};
pub use model::tag::{Tag, TagChanges, TagDraft, TagId};
pub use model::validation::ValidationError;
pub use model::EntityKind;
pub use render::{derive_excerpt, render_markdown};
pub use repo::{
    CategoryRepository, ContentStore, PostListQuery, PostRepository, RepoError, RepoResult,
    SqliteContentStore, TagRepository,
};
pub use service::content_service::ContentService;
pub use service::query_service::{PostPage, QueryService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
