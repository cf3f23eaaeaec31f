//! Account Tests
//!
//! Sign-up, login, logout and the session cookie.

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;

use yatube::domain::UserRepository;

use crate::common::{body_text, redirect_location, unique_username, TestApp, TEST_PASSWORD};

fn session_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .map(str::to_string)
}

fn signup_body(username: &str, password1: &str, password2: &str) -> String {
    format!(
        "username={}&first_name=Leo&last_name=Tolstoy&email=leo%40example.com&password1={}&password2={}",
        username, password1, password2
    )
}

#[tokio::test]
async fn test_signup_creates_user_and_signs_in() {
    let app = TestApp::new();
    let username = unique_username();

    let response = app
        .post_form(
            "/auth/signup/",
            &signup_body(&username, TEST_PASSWORD, TEST_PASSWORD),
            None,
        )
        .await;

    assert_eq!(redirect_location(&response), "/");
    let cookie = session_cookie(&response).unwrap();
    assert!(cookie.contains("HttpOnly"));

    let user = app
        .state
        .users
        .find_by_username(&username)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.full_name(), "Leo Tolstoy");
    assert_eq!(user.email.as_deref(), Some("leo@example.com"));
}

#[tokio::test]
async fn test_signup_rejects_duplicate_username() {
    let app = TestApp::new();
    app.create_user("taken").await;

    let response = app
        .post_form(
            "/auth/signup/",
            &signup_body("taken", TEST_PASSWORD, TEST_PASSWORD),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    assert!(body_text(response).await.contains("class=\"errors\""));
}

#[tokio::test]
async fn test_signup_rejects_mismatched_passwords() {
    let app = TestApp::new();

    let response = app
        .post_form(
            "/auth/signup/",
            &signup_body("newbie", TEST_PASSWORD, "SomethingElse123"),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.state.users.username_exists("newbie").await.unwrap());
}

#[tokio::test]
async fn test_login_follows_next() {
    let app = TestApp::new();
    app.create_user("author").await;

    let response = app
        .post_form(
            "/auth/login/",
            &format!("username=author&password={}&next=%2Fcreate%2F", TEST_PASSWORD),
            None,
        )
        .await;

    assert_eq!(redirect_location(&response), "/create/");
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let app = TestApp::new();
    app.create_user("author").await;

    let response = app
        .post_form(
            "/auth/login/",
            &format!(
                "username=author&password={}&next=https%3A%2F%2Fevil.example%2F",
                TEST_PASSWORD
            ),
            None,
        )
        .await;

    assert_eq!(redirect_location(&response), "/");
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = TestApp::new();
    app.create_user("author").await;

    let response = app
        .post_form("/auth/login/", "username=author&password=wrong-password", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_session_cookie_signs_visitor_in() {
    let app = TestApp::new();
    let user = app.create_user("author").await;

    let anonymous = body_text(app.get("/about/tech/").await).await;
    assert!(anonymous.contains("Log in"));

    let signed_in = body_text(
        app.get_as("/about/tech/", Some(&app.cookie_for(&user)))
            .await,
    )
    .await;
    assert!(signed_in.contains("Log out"));
}

#[tokio::test]
async fn test_tampered_session_is_anonymous() {
    let app = TestApp::new();

    let response = app.get_as("/create/", Some("session=not-a-token")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new();
    let user = app.create_user("author").await;

    let response = app
        .get_as("/auth/logout/", Some(&app.cookie_for(&user)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = session_cookie(&response).unwrap();
    assert!(cleared.starts_with("session=;"));
    assert!(body_text(response).await.contains("You have logged out"));
}
