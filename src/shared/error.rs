//! Application Error Types
//!
//! Centralized error handling with Axum integration. Errors render as HTML
//! pages since every route of the site serves HTML.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::SessionUser;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_)
            | AppError::Database(_)
            | AppError::Redis(_)
            | AppError::Template(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error page shown for any failed request.
#[derive(Template)]
#[template(path = "core/error.html")]
pub struct ErrorPage {
    pub viewer: Option<SessionUser>,
    pub code: u16,
    pub title: &'static str,
    pub message: String,
}

/// Dedicated not-found page.
#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundPage {
    pub viewer: Option<SessionUser>,
    pub path: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (title, message) = match &self {
            AppError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                let page = NotFoundPage {
                    viewer: None,
                    path: msg.clone(),
                };
                return render_error_page(status, page.render());
            }
            AppError::BadRequest(msg) => ("Bad request", msg.clone()),
            AppError::Forbidden(msg) => ("Forbidden", msg.clone()),
            AppError::Conflict(msg) => ("Conflict", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Server error", "Internal server error".to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Server error", "Internal server error".to_string())
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                ("Server error", "Internal server error".to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                ("Server error", "Internal server error".to_string())
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {}", e);
                ("Server error", "Internal server error".to_string())
            }
        };

        let page = ErrorPage {
            viewer: None,
            code: status.as_u16(),
            title,
            message,
        };
        render_error_page(status, page.render())
    }
}

fn render_error_page(status: StatusCode, rendered: askama::Result<String>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, status.canonical_reason().unwrap_or("Error")).into_response()
        }
    }
}
