//! Error to HTTP response mapping.

use crate::templates::NOT_FOUND_PAGE;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use blogengine_core::RepoError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;

/// Failure while serving a page.
#[derive(Debug)]
pub enum WebError {
    /// Route, post or page number does not exist.
    NotFound,
    Store(RepoError),
    Template(tera::Error),
    /// A handler panicked while holding the connection lock.
    StatePoisoned,
    /// Blocking query task panicked or was cancelled.
    Task(JoinError),
}

impl WebError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Store(err) => err.code(),
            Self::Template(_) => "template_error",
            Self::StatePoisoned => "state_poisoned",
            Self::Task(_) => "task_failed",
        }
    }
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "page not found"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Template(err) => write!(f, "template rendering failed: {err}"),
            Self::StatePoisoned => write!(f, "database lock poisoned"),
            Self::Task(err) => write!(f, "query task failed: {err}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Template(err) => Some(err),
            Self::Task(err) => Some(err),
            Self::NotFound | Self::StatePoisoned => None,
        }
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        if value.is_not_found() {
            Self::NotFound
        } else {
            Self::Store(value)
        }
    }
}

impl From<tera::Error> for WebError {
    fn from(value: tera::Error) -> Self {
        Self::Template(value)
    }
}

impl From<JoinError> for WebError {
    fn from(value: JoinError) -> Self {
        Self::Task(value)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            other => {
                error!(
                    "event=page_render module=web status=error error_code={} error={other}",
                    other.code()
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
