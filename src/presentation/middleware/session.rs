//! Session Middleware
//!
//! Resolves the `session` cookie into the signed-in user and stores it in the
//! request extensions, where the `Viewer` and `AuthUser` extractors find it.
//! A cookie that does not verify leaves the request anonymous.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::application::services::{AuthService, SESSION_COOKIE};
use crate::startup::AppState;

pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.auth_service().resolve_session(cookie.value()).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => debug!("Ignoring invalid session cookie"),
            Err(e) => warn!("Session lookup failed: {}", e),
        }
    }

    next.run(request).await
}
