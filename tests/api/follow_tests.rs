//! Follow Tests

use pretty_assertions::assert_eq;

use yatube::domain::FollowRepository;

use crate::common::{body_text, count_posts, redirect_location, TestApp};

#[tokio::test]
async fn test_follow_then_unfollow() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let cookie = app.cookie_for(&reader);

    let response = app
        .post_form("/profile/author/follow/", "", Some(&cookie))
        .await;
    assert_eq!(redirect_location(&response), "/profile/author/");
    assert!(app.state.follows.exists(reader.id, author.id).await.unwrap());

    let response = app
        .post_form("/profile/author/unfollow/", "", Some(&cookie))
        .await;
    assert_eq!(redirect_location(&response), "/profile/author/");
    assert!(!app.state.follows.exists(reader.id, author.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_twice_creates_one_subscription() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let cookie = app.cookie_for(&reader);

    app.get_as("/profile/author/follow/", Some(&cookie)).await;
    app.get_as("/profile/author/follow/", Some(&cookie)).await;

    assert_eq!(app.state.follows.count_followers(author.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let cookie = app.cookie_for(&author);

    let response = app.get_as("/profile/author/follow/", Some(&cookie)).await;

    assert_eq!(redirect_location(&response), "/profile/author/");
    assert!(!app.state.follows.exists(author.id, author.id).await.unwrap());
}

#[tokio::test]
async fn test_follow_feed_shows_only_followed_authors() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let stranger = app.create_user("stranger").await;
    app.create_post(&author, "Followed content", None, 0).await;
    app.get_as("/profile/author/follow/", Some(&app.cookie_for(&reader)))
        .await;

    let reader_feed = body_text(
        app.get_as("/follow/", Some(&app.cookie_for(&reader)))
            .await,
    )
    .await;
    assert_eq!(count_posts(&reader_feed), 1);
    assert!(reader_feed.contains("Followed content"));

    let stranger_feed = body_text(
        app.get_as("/follow/", Some(&app.cookie_for(&stranger)))
            .await,
    )
    .await;
    assert_eq!(count_posts(&stranger_feed), 0);
}

#[tokio::test]
async fn test_following_unknown_user_is_not_found() {
    let app = TestApp::new();
    let reader = app.create_user("reader").await;
    let cookie = app.cookie_for(&reader);

    let response = app.get_as("/profile/nobody/follow/", Some(&cookie)).await;

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_shows_follow_button_to_others_only() {
    let app = TestApp::new();
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;

    let own = body_text(
        app.get_as("/profile/author/", Some(&app.cookie_for(&author)))
            .await,
    )
    .await;
    assert!(!own.contains(">Follow</button>"));

    let other = body_text(
        app.get_as("/profile/author/", Some(&app.cookie_for(&reader)))
            .await,
    )
    .await;
    assert!(other.contains(">Follow</button>"));
}
