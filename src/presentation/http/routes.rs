//! Route Configuration
//!
//! All site routes. Paths keep their trailing slashes.

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::compression::CompressionLayer;

use super::handlers::{health, pages, posts, users};
use crate::infrastructure::metrics;
use crate::presentation::middleware::{cache_page, create_trace_layer, load_session, track_metrics};
use crate::startup::AppState;

/// Room for form fields next to the largest accepted upload.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the site router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.settings.media.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/",
            get(posts::index).layer(middleware::from_fn_with_state(state.clone(), cache_page)),
        )
        .merge(post_routes())
        .merge(auth_routes())
        .route("/media/{*path}", get(pages::media))
        .route("/about/author/", get(pages::about_author))
        .route("/about/tech/", get(pages::about_tech))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(create_trace_layer())
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics::gather_metrics(),
    )
}

/// Feeds, posts, comments and follows
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/group/{slug}/", get(posts::group_posts))
        .route("/profile/{username}/", get(posts::profile))
        .route(
            "/profile/{username}/follow/",
            get(posts::profile_follow).post(posts::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            get(posts::profile_unfollow).post(posts::profile_unfollow),
        )
        .route("/follow/", get(posts::follow_index))
        .route("/create/", get(posts::post_create_form).post(posts::post_create))
        .route("/posts/{post_id}/", get(posts::post_detail))
        .route(
            "/posts/{post_id}/edit/",
            get(posts::post_edit_form).post(posts::post_edit),
        )
        .route("/posts/{post_id}/comment/", axum::routing::post(posts::add_comment))
}

/// Sign-up, login and logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup/", get(users::signup_form).post(users::signup))
        .route("/auth/login/", get(users::login_form).post(users::login))
        .route("/auth/logout/", get(users::logout).post(users::logout))
}
