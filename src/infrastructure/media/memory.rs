use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::MediaStore;
use crate::shared::error::AppError;

/// Media kept in process memory. Used by tests and `media.backend = "memory"`.
#[derive(Default)]
pub struct MemoryMediaStore {
    files: DashMap<String, Vec<u8>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn write_new(&self, path: &str, data: &[u8]) -> Result<bool, AppError> {
        match self.files.entry(path.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(data.to_vec());
                Ok(true)
            }
        }
    }

    async fn open(&self, path: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.files.get(path).map(|f| f.value().clone()))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.files.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, AppError> {
        Ok(self.files.contains_key(path))
    }
}
