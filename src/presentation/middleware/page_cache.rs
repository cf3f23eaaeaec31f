//! Page Cache Middleware
//!
//! Serves GET requests from the page cache when a live entry exists for the
//! route, otherwise renders, stores successful responses, and passes them on.
//! Cache failures are logged and the page is rendered normally.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::infrastructure::cache::{route_key, CachedPage, PageCache};
use crate::infrastructure::metrics;
use crate::startup::AppState;

pub async fn cache_page(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = route_key(request.uri().path());
    match state.page_cache.get(&key).await {
        Ok(Some(page)) => {
            metrics::record_cache_lookup(true);
            return cached_response(page);
        }
        Ok(None) => metrics::record_cache_lookup(false),
        Err(e) => warn!(key = %key, "Page cache read failed: {}", e),
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to buffer response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html; charset=utf-8");
    if let Ok(text) = std::str::from_utf8(&bytes) {
        let page = CachedPage {
            content_type: content_type.to_string(),
            body: text.to_string(),
        };
        if let Err(e) = state.page_cache.put(&key, &page, state.index_ttl()).await {
            warn!(key = %key, "Page cache write failed: {}", e);
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn cached_response(page: CachedPage) -> Response {
    let content_type = HeaderValue::from_str(&page.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("text/html; charset=utf-8"));
    ([(header::CONTENT_TYPE, content_type)], page.body).into_response()
}
