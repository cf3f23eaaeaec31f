//! Request DTOs
//!
//! Form payloads submitted by browsers, validated with `validator`.

use std::borrow::Cow;

use image::ImageFormat;
use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::domain::is_valid_username;

const REQUIRED: &str = "This field is required.";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects text that is empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", REQUIRED));
    }
    Ok(())
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    if !is_valid_username(value) {
        return Err(error(
            "invalid_username",
            "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

fn optional_email(value: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() && !value.trim().validate_email() {
        return Err(error("email", "Enter a valid email address."));
    }
    Ok(())
}

/// A file received in a multipart upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Formats accepted for post images.
    pub const ACCEPTED: [ImageFormat; 7] = [
        ImageFormat::Gif,
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::WebP,
        ImageFormat::Bmp,
        ImageFormat::Ico,
        ImageFormat::Tiff,
    ];

    /// Sniffs the content; the file name and declared type are ignored.
    pub fn format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.data)
            .ok()
            .filter(|f| Self::ACCEPTED.contains(f))
    }
}

/// What an edit does to the post image.
#[derive(Debug, Clone, Default)]
pub enum ImageChange {
    #[default]
    Keep,
    Clear,
    Replace(ImageUpload),
}

/// Create/edit post form, decoded from `multipart/form-data`.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,

    /// Raw value of the group select; empty means no group.
    pub group: String,

    pub image: ImageChange,
}

impl PostForm {
    /// `Ok(None)` for no group, `Err` when the value is not an id.
    pub fn group_id(&self) -> Result<Option<i64>, ()> {
        let raw = self.group.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(|_| ())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 150, message = "Enter a username of at most 150 characters."),
        custom(function = "username_chars")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,

    #[serde(default)]
    #[validate(custom(function = "optional_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password1: String,

    #[serde(default)]
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
}

impl SignupForm {
    pub fn email(&self) -> Option<String> {
        let email = self.email.trim();
        (!email.is_empty()).then(|| email.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,

    #[serde(default)]
    pub next: Option<String>,
}

/// A redirect target is honoured only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
