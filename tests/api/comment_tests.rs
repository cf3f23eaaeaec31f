//! Comment Tests

use axum::http::StatusCode;

use yatube::domain::CommentRepository;

use crate::common::{body_text, redirect_location, TestApp};

#[tokio::test]
async fn test_comment_appears_on_post_page() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let post = app.create_post(&author, "Hello", None, 0).await;
    let cookie = app.cookie_for(&reader);

    let response = app
        .post_form(
            &format!("/posts/{}/comment/", post.id),
            "text=Nice+post",
            Some(&cookie),
        )
        .await;

    assert_eq!(redirect_location(&response), format!("/posts/{}/", post.id));
    assert_eq!(app.state.comments.count_for_post(post.id).await.unwrap(), 1);

    let html = body_text(app.get(&format!("/posts/{}/", post.id)).await).await;
    assert!(html.contains("Nice post"));
    assert!(html.contains("reader"));
}

#[tokio::test]
async fn test_blank_comment_is_not_saved() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Hello", None, 0).await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_form(&format!("/posts/{}/comment/", post.id), "text=+++", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.state.comments.count_for_post(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_comment_on_missing_post_is_not_found() {
    let app = TestApp::new();
    let reader = app.create_user("reader").await;
    let cookie = app.cookie_for(&reader);

    let response = app
        .post_form("/posts/4242/comment/", "text=Hi", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
