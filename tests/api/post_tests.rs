//! Post Create and Edit Tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;

use yatube::domain::{FeedScope, PostRepository};

use crate::common::{body_bytes, body_text, redirect_location, TestApp, SMALL_GIF};

#[tokio::test]
async fn test_create_post_redirects_to_profile() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let group = app.create_group("Cats", "cats").await;
    let cookie = app.cookie_for(&author);
    let group_id = group.id.to_string();

    let response = app
        .post_multipart(
            "/create/",
            &[("text", "Brand new post"), ("group", &group_id)],
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(redirect_location(&response), "/profile/author/");
    assert_eq!(app.state.posts.count(FeedScope::All).await.unwrap(), 1);
    assert_eq!(app.state.posts.count(FeedScope::Group(group.id)).await.unwrap(), 1);

    let html = body_text(app.get("/group/cats/").await).await;
    assert!(html.contains("Brand new post"));
}

#[tokio::test]
async fn test_create_post_with_blank_text_rerenders_form() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_multipart("/create/", &[("text", "   "), ("group", "")], None, Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("class=\"errors\""));
    assert_eq!(app.state.posts.count(FeedScope::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_post_with_unknown_group_rerenders_form() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_multipart(
            "/create/",
            &[("text", "Hello"), ("group", "999")],
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.posts.count(FeedScope::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_created_image_is_served_and_shown() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_multipart(
            "/create/",
            &[("text", "With a picture"), ("group", "")],
            Some(("small.gif", SMALL_GIF)),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let posts = app.state.posts.list(FeedScope::All, 10, 0).await.unwrap();
    let post = &posts[0].post;
    assert_eq!(post.image.as_deref(), Some("posts/small.gif"));

    for uri in [
        "/".to_string(),
        "/profile/author/".to_string(),
        format!("/posts/{}/", post.id),
    ] {
        app.clear_cache().await;
        let html = body_text(app.get(&uri).await).await;
        assert!(html.contains("small.gif"), "image missing on {}", uri);
    }

    let media = app.get("/media/posts/small.gif").await;
    assert_eq!(media.status(), StatusCode::OK);
    assert_eq!(media.headers()[header::CONTENT_TYPE], "image/gif");
    assert_eq!(body_bytes(media).await, SMALL_GIF);
}

#[tokio::test]
async fn test_non_image_upload_is_rejected() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_multipart(
            "/create/",
            &[("text", "Hello"), ("group", "")],
            Some(("notes.txt", b"just some text")),
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.posts.count(FeedScope::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_author_can_edit_post() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cats = app.create_group("Cats", "cats").await;
    let group = app.create_group("Dogs", "dogs").await;
    let post = app.create_post(&author, "Original", Some(&cats), 5).await;
    let cookie = app.cookie_for(&author);
    let group_id = group.id.to_string();

    let response = app
        .post_multipart(
            &format!("/posts/{}/edit/", post.id),
            &[("text", "Edited"), ("group", &group_id)],
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(redirect_location(&response), format!("/posts/{}/", post.id));
    let stored = app.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Edited");
    assert_eq!(stored.group_id, Some(group.id));
    assert_eq!(stored.author_id, author.id);
    assert_eq!(stored.pub_date, post.pub_date);
    assert_eq!(app.state.posts.count(FeedScope::All).await.unwrap(), 1);
    assert_eq!(app.state.posts.count(FeedScope::Group(cats.id)).await.unwrap(), 0);
    assert!(!body_text(app.get("/group/cats/").await).await.contains("Edited"));
}

#[tokio::test]
async fn test_non_author_cannot_edit_post() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let post = app.create_post(&author, "Original", None, 0).await;
    let cookie = app.cookie_for(&reader);

    let response = app
        .post_multipart(
            &format!("/posts/{}/edit/", post.id),
            &[("text", "Hijacked"), ("group", "")],
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(redirect_location(&response), format!("/posts/{}/", post.id));
    let stored = app.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Original");
}

#[tokio::test]
async fn test_edit_keeps_image_unless_cleared() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);
    app.post_multipart(
        "/create/",
        &[("text", "Picture"), ("group", "")],
        Some(("small.gif", SMALL_GIF)),
        Some(&cookie),
    )
    .await;
    let post = app.state.posts.list(FeedScope::All, 1, 0).await.unwrap()[0]
        .post
        .clone();
    let edit_uri = format!("/posts/{}/edit/", post.id);

    app.post_multipart(&edit_uri, &[("text", "Still a picture"), ("group", "")], None, Some(&cookie))
        .await;
    let kept = app.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(kept.image.as_deref(), Some("posts/small.gif"));

    app.post_multipart(
        &edit_uri,
        &[("text", "No picture"), ("group", ""), ("image-clear", "on")],
        None,
        Some(&cookie),
    )
    .await;
    let cleared = app.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(cleared.image, None);
}
