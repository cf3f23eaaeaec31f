//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use yatube::application::dto::SignupForm;
use yatube::application::services::AuthService;
use yatube::config::Settings;
use yatube::domain::{Group, GroupRepository, Post, PostRepository, User};
use yatube::infrastructure::cache::PageCache;
use yatube::presentation::http::routes;
use yatube::startup::AppState;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// A 1x1 GIF.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

const BOUNDARY: &str = "yatube-test-boundary";

/// Test application backed by in-memory storage, cache and media
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(Settings::in_memory())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let state = AppState::in_memory(settings);
        let router = routes::create_router(state.clone());
        Self { state, router }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET as an anonymous visitor
    pub async fn get(&self, uri: &str) -> Response {
        self.get_as(uri, None).await
    }

    /// GET, optionally carrying a session cookie
    pub async fn get_as(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// POST an url-encoded form
    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// POST a multipart form with text fields and an optional `image` file
    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = multipart_body(fields, image);
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Register a user through the account service
    pub async fn create_user(&self, username: &str) -> User {
        let form = SignupForm {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password1: TEST_PASSWORD.to_string(),
            password2: TEST_PASSWORD.to_string(),
        };
        self.state.auth_service().signup(&form).await.unwrap()
    }

    /// `Cookie` header value that signs `user` in
    pub fn cookie_for(&self, user: &User) -> String {
        let token = self.state.auth_service().issue_session(user.id).unwrap();
        format!("session={}", token)
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Group {
        let group = Group {
            id: self.state.snowflake.generate(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: format!("All about {}", title),
        };
        self.state.groups.create(&group).await.unwrap()
    }

    /// Store a post published `minutes_ago` minutes in the past
    pub async fn create_post(
        &self,
        author: &User,
        text: &str,
        group: Option<&Group>,
        minutes_ago: i64,
    ) -> Post {
        let post = Post {
            id: self.state.snowflake.generate(),
            text: text.to_string(),
            pub_date: Utc::now() - Duration::minutes(minutes_ago),
            author_id: author.id,
            group_id: group.map(|g| g.id),
            image: None,
        };
        self.state.posts.create(&post).await.unwrap()
    }

    /// Store `count` posts, the first one newest
    pub async fn create_posts(&self, author: &User, count: usize, group: Option<&Group>) {
        for i in 0..count {
            self.create_post(author, &format!("Post number {}", i), group, i as i64)
                .await;
        }
    }

    pub async fn clear_cache(&self) {
        self.state.page_cache.clear().await.unwrap();
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// `Location` of a 302 response
pub fn redirect_location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::FOUND);
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Number of posts rendered on a feed page
pub fn count_posts(html: &str) -> usize {
    html.matches("<article>").count()
}

/// Generate a unique test username
pub fn unique_username() -> String {
    format!("user_{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}
