//! Route handlers.

use crate::error::WebError;
use crate::state::AppState;
use crate::views::{post_views, PostView};
use axum::extract::{Path, Query, State};
use axum::response::Html;
use blogengine_core::service::query_service::normalize_page_limit;
use log::debug;
use serde::Deserialize;
use tera::Context;

/// Raw query string of the front page; `page` is validated by hand so bad
/// values answer 404 like out-of-range ones.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    page: Option<String>,
}

/// 1-based page number. Blank means the first page.
fn page_number(raw: Option<&str>) -> Result<u32, WebError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(value) => match value.parse::<u32>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(WebError::NotFound),
        },
    }
}

pub(crate) async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, WebError> {
    let page = page_number(params.page.as_deref())?;
    let limit = normalize_page_limit(Some(state.site.posts_per_page));
    let offset = (page - 1).saturating_mul(limit);
    let result = state
        .with_queries(move |queries| queries.list_page(Some(limit), offset))
        .await?;
    if page > 1 && result.items.is_empty() {
        return Err(WebError::NotFound);
    }
    debug!(
        "event=page_render module=web status=ok page=index number={page} count={}",
        result.items.len()
    );

    let mut context = base_context(&state);
    context.insert("posts", &post_views(&result.items));
    context.insert("previous_page", &(page > 1).then(|| page - 1));
    context.insert("next_page", &result.has_more.then(|| page + 1));
    render(&state, "index.html", &context)
}

pub(crate) async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, WebError> {
    let entry = state
        .with_queries(move |queries| queries.get_by_slug(&slug))
        .await?;
    debug!(
        "event=page_render module=web status=ok page=post post_id={}",
        entry.post.id
    );

    let mut context = base_context(&state);
    context.insert("post", &PostView::from(&entry));
    render(&state, "post.html", &context)
}

pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, WebError> {
    let (name, entries) = state
        .with_queries(move |queries| {
            let name = queries
                .category_by_slug(&slug)?
                .map_or(slug.clone(), |category| category.name);
            Ok((name, queries.list_by_category(&slug)?))
        })
        .await?;
    debug!(
        "event=page_render module=web status=ok page=category count={}",
        entries.len()
    );

    let mut context = base_context(&state);
    context.insert("heading", &format!("Category: {name}"));
    context.insert("posts", &post_views(&entries));
    render(&state, "listing.html", &context)
}

pub(crate) async fn tag_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, WebError> {
    let (name, entries) = state
        .with_queries(move |queries| {
            let name = queries
                .tag_by_slug(&slug)?
                .map_or(slug.clone(), |tag| tag.name);
            Ok((name, queries.list_by_tag(&slug)?))
        })
        .await?;
    debug!(
        "event=page_render module=web status=ok page=tag count={}",
        entries.len()
    );

    let mut context = base_context(&state);
    context.insert("heading", &format!("Tag: {name}"));
    context.insert("posts", &post_views(&entries));
    render(&state, "listing.html", &context)
}

pub(crate) async fn not_found() -> WebError {
    WebError::NotFound
}

fn base_context(state: &AppState) -> Context {
    let mut context = Context::new();
    context.insert("site_title", &state.site.title);
    context
}

fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, WebError> {
    Ok(Html(state.templates.render(template, context)?))
}
