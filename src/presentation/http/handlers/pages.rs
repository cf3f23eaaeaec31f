//! Media, static pages and the not-found fallback.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use askama::Template;

use crate::infrastructure::media::{is_safe_path, MediaStore};
use crate::presentation::http::extractors::Viewer;
use crate::presentation::http::views::{render, AboutAuthorPage, AboutTechPage};
use crate::shared::error::{AppError, NotFoundPage};
use crate::startup::AppState;

/// Serve an uploaded file with its sniffed content type.
pub async fn media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound(format!("/media/{}", path));
    if !is_safe_path(&path) {
        return Err(not_found());
    }

    let data = state.media.open(&path).await?.ok_or_else(not_found)?;
    let content_type = image::guess_format(&data)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");

    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}

pub async fn about_author(Viewer(viewer): Viewer) -> Result<Response, AppError> {
    render(&AboutAuthorPage { viewer })
}

pub async fn about_tech(Viewer(viewer): Viewer) -> Result<Response, AppError> {
    render(&AboutTechPage { viewer })
}

/// Fallback for unknown routes.
pub async fn not_found(Viewer(viewer): Viewer, uri: Uri) -> Result<Response, AppError> {
    let page = NotFoundPage {
        viewer,
        path: uri.path().to_string(),
    };
    Ok((StatusCode::NOT_FOUND, Html(page.render()?)).into_response())
}
