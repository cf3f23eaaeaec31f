//! Multipart form decoding for the post create/edit pages.

use axum::extract::Multipart;

use crate::application::dto::{ImageChange, ImageUpload, PostForm};
use crate::shared::error::AppError;

/// Read `text`, `group`, `image` and `image-clear` from a multipart body.
///
/// An empty file input means "no new image"; `image-clear` only applies when
/// no file was uploaded alongside it.
pub async fn read_post_form(mut multipart: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();
    let mut upload = None;
    let mut clear = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "text" => form.text = field_text(field).await?,
            "group" => form.group = field_text(field).await?,
            "image-clear" => clear = !field_text(field).await?.is_empty(),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Upload failed: {}", e)))?;
                if !data.is_empty() {
                    upload = Some(ImageUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    form.image = match (upload, clear) {
        (Some(upload), _) => ImageChange::Replace(upload),
        (None, true) => ImageChange::Clear,
        (None, false) => ImageChange::Keep,
    };
    Ok(form)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form field: {}", e)))
}
