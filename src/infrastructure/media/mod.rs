//! Media Storage
//!
//! Uploaded post images live under `posts/` relative to the media root. The
//! stored relative path is what a post keeps and what `/media/{*path}` serves.

mod local;
mod memory;

pub use local::LocalMediaStore;
pub use memory::MemoryMediaStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::shared::error::AppError;

/// Directory uploads are stored in, relative to the media root.
pub const UPLOAD_DIR: &str = "posts";

/// Suffixed names tried after the plain upload name is taken.
const SAVE_ATTEMPTS: usize = 8;

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write `data` to `path` only if nothing is stored there yet.
    ///
    /// Returns `false` without touching the existing file when `path` is taken.
    async fn write_new(&self, path: &str, data: &[u8]) -> Result<bool, AppError>;

    async fn open(&self, path: &str) -> Result<Option<Vec<u8>>, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;

    async fn exists(&self, path: &str) -> Result<bool, AppError>;

    /// Stores an upload under `posts/` and returns the path it was saved as.
    /// A clash with an existing file gets a random suffix before the extension.
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<String, AppError> {
        let base = upload_path(file_name);
        if self.write_new(&base, data).await? {
            return Ok(base);
        }
        for _ in 0..SAVE_ATTEMPTS {
            let suffix = Uuid::new_v4().simple().to_string();
            let path = with_suffix(&base, &suffix[..8]);
            if self.write_new(&path, data).await? {
                return Ok(path);
            }
        }
        Err(AppError::Internal(format!("No free media name for {}", base)))
    }
}

/// Storage path for an uploaded file name: directory parts are dropped and
/// anything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn upload_path(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let name_trimmed = name.trim_start_matches('.');
    if name_trimmed.is_empty() {
        name = "upload".to_string();
    } else {
        name = name_trimmed.to_string();
    }

    format!("{}/{}", UPLOAD_DIR, name)
}

fn with_suffix(path: &str, suffix: &str) -> String {
    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
    let file = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", file, suffix),
    };
    if dir.is_empty() {
        file
    } else {
        format!("{}/{}", dir, file)
    }
}

/// A relative path with no empty, `.` or `..` segments.
pub fn is_safe_path(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}
