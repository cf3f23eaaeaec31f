//! Main Feed Cache Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use yatube::domain::PostRepository;

use crate::common::{body_bytes, body_text, TestApp};

#[tokio::test]
async fn test_index_is_served_from_cache_until_cleared() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Cached post", None, 1).await;

    let first = body_bytes(app.get("/").await).await;

    app.state.posts.delete(post.id).await.unwrap();
    let second = body_bytes(app.get("/").await).await;
    assert_eq!(first, second);

    app.clear_cache().await;
    let third = body_text(app.get("/").await).await;
    assert!(!third.contains("Cached post"));
}

#[tokio::test]
async fn test_new_post_hidden_until_cache_cleared() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_post(&author, "Existing post", None, 5).await;
    let cookie = app.cookie_for(&author);

    let first = body_bytes(app.get("/").await).await;

    let created = app
        .post_multipart(
            "/create/",
            &[("text", "Freshly written"), ("group", "")],
            None,
            Some(&cookie),
        )
        .await;
    assert_eq!(created.status(), StatusCode::FOUND);

    let second = body_bytes(app.get("/").await).await;
    assert_eq!(first, second);

    app.clear_cache().await;
    let third = body_text(app.get("/").await).await;
    assert!(third.contains("Freshly written"));
}

#[tokio::test]
async fn test_cache_ignores_query_string() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_posts(&author, 3, None).await;

    let first = body_bytes(app.get("/").await).await;
    let second = body_bytes(app.get("/?page=1").await).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_error_responses_are_not_cached() {
    let app = TestApp::new();

    let missing = app.get("/?page=5").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let author = app.create_user("author").await;
    app.create_post(&author, "Fresh post", None, 0).await;
    let html = body_text(app.get("/").await).await;
    assert!(html.contains("Fresh post"));
}

#[tokio::test]
async fn test_other_feeds_are_not_cached() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_post(&author, "First", None, 1).await;

    body_bytes(app.get("/profile/author/").await).await;
    app.create_post(&author, "Second", None, 0).await;
    let html = body_text(app.get("/profile/author/").await).await;

    assert!(html.contains("Second"));
}
