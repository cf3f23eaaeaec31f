//! Data Transfer Objects
//!
//! Form payloads accepted by the HTTP layer.

pub mod request;

pub use request::{
    safe_next, CommentForm, ImageChange, ImageUpload, LoginForm, PostForm, SignupForm,
};
