//! Shared request state.

use crate::error::WebError;
use crate::templates;
use blogengine_core::{QueryService, RepoResult, SqliteContentStore};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tera::Tera;
use tokio::task;

/// Site-wide presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub title: String,
    pub posts_per_page: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "blogengine".to_string(),
            posts_per_page: 10,
        }
    }
}

/// State cloned into every handler.
///
/// One SQLite connection is shared behind a mutex; each request holds the
/// lock for a single query, off the async worker threads.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub(crate) templates: Arc<Tera>,
    pub(crate) site: Arc<SiteSettings>,
}

impl AppState {
    /// Wraps a migrated connection and compiles the page templates.
    ///
    /// # Errors
    /// - A bundled template fails to parse.
    pub fn new(conn: Connection, site: SiteSettings) -> Result<Self, WebError> {
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            templates: Arc::new(templates::load()?),
            site: Arc::new(site),
        })
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    /// Runs `run` against the shared connection on the blocking pool.
    pub(crate) async fn with_queries<T, F>(&self, run: F) -> Result<T, WebError>
    where
        F: FnOnce(&QueryService<SqliteContentStore<'_>>) -> RepoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let mut conn = db.lock().map_err(|_| WebError::StatePoisoned)?;
            let queries = QueryService::new(SqliteContentStore::try_new(&mut conn)?);
            Ok(run(&queries)?)
        })
        .await?
    }
}
