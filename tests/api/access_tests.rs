//! Page Access Tests
//!
//! Which pages anonymous visitors, authors and other users may open.

use axum::http::StatusCode;
use test_case::test_case;

use yatube::domain::PostRepository;

use crate::common::{body_text, redirect_location, TestApp};

#[test_case("/" ; "index")]
#[test_case("/group/cats/" ; "group feed")]
#[test_case("/profile/author/" ; "profile")]
#[test_case("/about/author/" ; "about author")]
#[test_case("/about/tech/" ; "about tech")]
#[test_case("/auth/signup/" ; "signup")]
#[test_case("/auth/login/" ; "login")]
#[tokio::test]
async fn test_public_pages_are_open_to_anonymous(uri: &str) {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let group = app.create_group("Cats", "cats").await;
    app.create_post(&author, "Hello", Some(&group), 0).await;

    let response = app.get(uri).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_post_detail_is_public() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Hello", None, 0).await;

    let response = app.get(&format!("/posts/{}/", post.id)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[test_case("/create/", "/auth/login/?next=%2Fcreate%2F" ; "create")]
#[test_case("/follow/", "/auth/login/?next=%2Ffollow%2F" ; "follow feed")]
#[test_case(
    "/profile/author/follow/",
    "/auth/login/?next=%2Fprofile%2Fauthor%2Ffollow%2F" ;
    "follow"
)]
#[test_case(
    "/profile/author/unfollow/",
    "/auth/login/?next=%2Fprofile%2Fauthor%2Funfollow%2F" ;
    "unfollow"
)]
#[tokio::test]
async fn test_private_pages_redirect_anonymous_to_login(uri: &str, expected: &str) {
    let app = TestApp::new();
    app.create_user("author").await;

    let response = app.get(uri).await;

    assert_eq!(redirect_location(&response), expected);
}

#[test_case("/profile/author/follow/" ; "follow")]
#[test_case("/profile/author/unfollow/" ; "unfollow")]
#[tokio::test]
async fn test_follow_posts_redirect_anonymous_to_login(uri: &str) {
    let app = TestApp::new();
    app.create_user("author").await;

    let response = app.post_form(uri, "", None).await;

    assert!(redirect_location(&response).starts_with("/auth/login/?next=%2Fprofile%2Fauthor%2F"));
}

#[tokio::test]
async fn test_edit_redirects_anonymous_to_login() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Hello", None, 0).await;

    let response = app.get(&format!("/posts/{}/edit/", post.id)).await;

    assert_eq!(
        redirect_location(&response),
        format!("/auth/login/?next=%2Fposts%2F{}%2Fedit%2F", post.id)
    );
}

#[tokio::test]
async fn test_edit_of_missing_post_redirects_anonymous_to_login() {
    let app = TestApp::new();

    let response = app.get("/posts/999/edit/").await;

    assert_eq!(
        redirect_location(&response),
        "/auth/login/?next=%2Fposts%2F999%2Fedit%2F"
    );
}

#[tokio::test]
async fn test_edit_with_plain_form_body_still_redirects() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let post = app.create_post(&author, "Original", None, 0).await;
    let uri = format!("/posts/{}/edit/", post.id);

    let anonymous = app.post_form(&uri, "text=hacked", None).await;
    assert_eq!(
        redirect_location(&anonymous),
        format!("/auth/login/?next=%2Fposts%2F{}%2Fedit%2F", post.id)
    );

    let cookie = app.cookie_for(&reader);
    let other = app.post_form(&uri, "text=hacked", Some(&cookie)).await;
    assert_eq!(redirect_location(&other), format!("/posts/{}/", post.id));

    let stored = app.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Original");
}

#[tokio::test]
async fn test_edit_with_plain_form_body_from_author_is_bad_request() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Original", None, 0).await;
    let cookie = app.cookie_for(&author);

    let response = app
        .post_form(&format!("/posts/{}/edit/", post.id), "text=x", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_redirects_non_author_to_post() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let post = app.create_post(&author, "Hello", None, 0).await;
    let cookie = app.cookie_for(&reader);

    let response = app
        .get_as(&format!("/posts/{}/edit/", post.id), Some(&cookie))
        .await;

    assert_eq!(redirect_location(&response), format!("/posts/{}/", post.id));
}

#[tokio::test]
async fn test_edit_is_open_to_author() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Hello there", None, 0).await;
    let cookie = app.cookie_for(&author);

    let response = app
        .get_as(&format!("/posts/{}/edit/", post.id), Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Hello there"));
}

#[tokio::test]
async fn test_comment_redirects_anonymous_to_login() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "Hello", None, 0).await;

    let response = app
        .post_form(&format!("/posts/{}/comment/", post.id), "text=hi", None)
        .await;

    assert_eq!(
        redirect_location(&response),
        format!("/auth/login/?next=%2Fposts%2F{}%2Fcomment%2F", post.id)
    );
}

#[test_case("/unexisting_page/" ; "unknown route")]
#[test_case("/group/nope/" ; "unknown group")]
#[test_case("/profile/nobody/" ; "unknown user")]
#[test_case("/posts/12345/" ; "unknown post")]
#[test_case("/posts/not-a-number/" ; "malformed post id")]
#[tokio::test]
async fn test_missing_pages_return_not_found(uri: &str) {
    let app = TestApp::new();

    let response = app.get(uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_not_found_page_uses_custom_template() {
    let app = TestApp::new();

    let response = app.get("/unexisting_page/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("Page not found"));
    assert!(html.contains("unexisting_page"));
}
