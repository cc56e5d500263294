use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use blogengine_core::db::open_db_in_memory;
use blogengine_core::{CategoryDraft, ContentService, PostDraft, SqliteContentStore, TagDraft};
use blogengine_web::{router, AppState, SiteSettings};
use tower::ServiceExt;

const DAY_MS: i64 = 86_400_000;

fn seeded_state(posts_per_page: u32) -> AppState {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut content = ContentService::new(SqliteContentStore::try_new(&mut conn).unwrap());
        let python = content
            .create_category(&CategoryDraft::new(
                "python",
                "The Python programming language",
            ))
            .unwrap();
        let django = content.create_tag(&TagDraft::new("Django", "")).unwrap();
        content
            .create_post(
                &PostDraft::new(
                    "My first post",
                    "This is [my first blog post](http://127.0.0.1:8000/)",
                    DAY_MS,
                    1,
                )
                .with_category(python.id)
                .with_tags([django.id]),
            )
            .unwrap();
        content
            .create_post(&PostDraft::new("Second thoughts", "*Plain* text", DAY_MS * 2, 1))
            .unwrap();
    }
    AppState::new(
        conn,
        SiteSettings {
            title: "Test blog".to_string(),
            posts_per_page,
        },
    )
    .unwrap()
}

async fn get(state: AppState, uri: &str) -> (StatusCode, String) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_posts_newest_first() {
    let (status, body) = get(seeded_state(10), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Test blog"));
    let newer = body.find("Second thoughts").unwrap();
    let older = body.find("My first post").unwrap();
    assert!(newer < older);
    assert!(body.contains("href=\"/post/my-first-post/\""));
}

#[tokio::test]
async fn index_paginates_with_page_parameter() {
    let state = seeded_state(1);
    let (status, body) = get(state.clone(), "/?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("My first post"));
    assert!(!body.contains("Second thoughts"));
    assert!(body.contains("/?page=1"));

    let (status, _) = get(state, "/?page=9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_page_numbers_return_not_found_page() {
    let state = seeded_state(1);
    for uri in ["/?page=abc", "/?page=-1", "/?page=0"] {
        let (status, body) = get(state.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("Page not found"), "{uri}");
    }

    let (status, body) = get(state, "/?page=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Second thoughts"));
}

#[tokio::test]
async fn post_page_renders_markdown_body() {
    let (status, body) = get(seeded_state(10), "/post/my-first-post/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<a href=\"http://127.0.0.1:8000/\">my first blog post</a>"));
    assert!(body.contains("href=\"/category/python/\""));
    assert!(body.contains("href=\"/tag/django/\""));
}

#[tokio::test]
async fn unknown_post_and_route_return_not_found() {
    let state = seeded_state(10);
    let (status, body) = get(state.clone(), "/post/missing/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));

    let (status, _) = get(state, "/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_and_tag_pages_filter_posts() {
    let state = seeded_state(10);
    let (status, body) = get(state.clone(), "/category/python/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("My first post"));
    assert!(!body.contains("Second thoughts"));

    let (status, body) = get(state.clone(), "/tag/django").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("My first post"));
    assert!(!body.contains("Second thoughts"));

    let (status, body) = get(state, "/tag/unknown/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No posts found."));
}

#[tokio::test]
async fn listing_headings_use_term_names() {
    let state = seeded_state(10);
    let (_, body) = get(state.clone(), "/tag/django/").await;
    assert!(body.contains("<h2>Tag: Django</h2>"));

    let (_, body) = get(state.clone(), "/category/python/").await;
    assert!(body.contains("<h2>Category: python</h2>"));

    let (_, body) = get(state, "/category/unknown-topic/").await;
    assert!(body.contains("<h2>Category: unknown-topic</h2>"));
}
