//! Custom Extractors
//!
//! The session middleware stores the signed-in user (if any) in the request
//! extensions; these extractors read it back in handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::domain::{SessionUser, Visitor};

/// The login page path.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Whoever is making the request, signed in or not.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<SessionUser>);

impl Viewer {
    pub fn visitor(&self) -> Visitor {
        Visitor::from_user_id(self.0.as_ref().map(|u| u.id))
    }

    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<SessionUser>().cloned()))
    }
}

/// A signed-in user. Handlers taking this redirect anonymous visitors to
/// the login page, with the requested path in `next`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| login_redirect(&parts.uri))
    }
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Login URL that returns to `uri` afterwards.
pub fn login_url(uri: &Uri) -> String {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next))
}

pub fn login_redirect(uri: &Uri) -> Response {
    found(&login_url(uri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_keeps_query() {
        let uri: Uri = "/create/".parse().unwrap();
        assert_eq!(login_url(&uri), "/auth/login/?next=%2Fcreate%2F");

        let uri: Uri = "/follow/?page=2".parse().unwrap();
        assert_eq!(login_url(&uri), "/auth/login/?next=%2Ffollow%2F%3Fpage%3D2");
    }

    #[test]
    fn test_found_sets_location() {
        let response = found("/posts/1/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/posts/1/");
    }
}
