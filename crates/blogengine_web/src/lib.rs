//! HTTP surface for the public blog pages.
//!
//! # Responsibility
//! - Map visitor routes onto the read-only query layer.
//! - Render pages through compiled-in Tera templates.
//!
//! # Invariants
//! - Handlers never write to the content store.
//! - Unknown routes and unknown slugs answer `404` with the static page.

mod error;
mod pages;
mod state;
mod templates;
mod views;

use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

pub use error::WebError;
pub use state::{AppState, SiteSettings};
pub use views::{LinkView, PostView};

/// Builds the public router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/post/:slug", get(pages::post_detail))
        .route("/post/:slug/", get(pages::post_detail))
        .route("/category/:slug", get(pages::category_posts))
        .route("/category/:slug/", get(pages::category_posts))
        .route("/tag/:slug", get(pages::tag_posts))
        .route("/tag/:slug/", get(pages::tag_posts))
        .fallback(pages::not_found)
        .with_state(state)
}

/// Binds `bind_addr` and serves the router until the process stops.
///
/// # Errors
/// - Address cannot be bound.
/// - Accept loop fails.
pub async fn serve(state: AppState, bind_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(
        "event=http_listen module=web status=ok addr={}",
        listener.local_addr()?
    );
    axum::serve(listener, router(state)).await
}
