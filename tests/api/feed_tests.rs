//! Feed and Pagination Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_text, count_posts, TestApp};

#[tokio::test]
async fn test_feeds_paginate_by_ten() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let group = app.create_group("Cats", "cats").await;
    app.create_posts(&author, 13, Some(&group)).await;

    for base in ["/", "/group/cats/", "/profile/author/"] {
        app.clear_cache().await;
        let first = body_text(app.get(base).await).await;
        assert_eq!(count_posts(&first), 10, "first page of {}", base);

        // The main feed cache is keyed by path alone.
        app.clear_cache().await;
        let second = body_text(app.get(&format!("{}?page=2", base)).await).await;
        assert_eq!(count_posts(&second), 3, "second page of {}", base);
    }
}

#[tokio::test]
async fn test_page_past_the_end_is_not_found() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_posts(&author, 13, None).await;

    let response = app.get("/profile/author/?page=3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_page_number_is_not_found() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_posts(&author, 3, None).await;

    for query in ["?page=0", "?page=abc", "?page=-1"] {
        let response = app.get(&format!("/profile/author/{}", query)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", query);
    }
}

#[tokio::test]
async fn test_empty_feed_renders_first_page() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(count_posts(&html), 0);
    assert!(html.contains("No posts yet."));
}

#[tokio::test]
async fn test_feed_is_newest_first() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_post(&author, "Older post", None, 10).await;
    app.create_post(&author, "Newer post", None, 1).await;

    let html = body_text(app.get("/profile/author/").await).await;

    let newer = html.find("Newer post").unwrap();
    let older = html.find("Older post").unwrap();
    assert!(newer < older);
}

#[tokio::test]
async fn test_group_feed_only_shows_its_posts() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cats = app.create_group("Cats", "cats").await;
    let dogs = app.create_group("Dogs", "dogs").await;
    app.create_post(&author, "Purring", Some(&cats), 0).await;
    app.create_post(&author, "Barking", Some(&dogs), 1).await;

    let html = body_text(app.get("/group/cats/").await).await;

    assert!(html.contains("Purring"));
    assert!(!html.contains("Barking"));
    assert!(html.contains("All about Cats"));
}

#[tokio::test]
async fn test_profile_shows_post_count_and_name() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_posts(&author, 4, None).await;

    let html = body_text(app.get("/profile/author/").await).await;

    assert!(html.contains("Posts: 4"));
    assert!(html.contains("All posts by author"));
}

#[tokio::test]
async fn test_post_text_is_escaped() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    app.create_post(&author, "<b>bold", None, 0).await;

    let html = body_text(app.get("/profile/author/").await).await;

    assert!(html.contains("&lt;b&gt;bold"));
    assert!(!html.contains("<b>bold"));
}
