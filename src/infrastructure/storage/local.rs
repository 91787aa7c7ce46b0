use crate::domain::entities::StoredObject;
use crate::domain::ports::object_storage::ObjectStorage;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Attachment store on the local filesystem. Objects are addressed by a
/// generated storage id and served statically under `public_url`.
#[derive(Clone)]
pub struct LocalObjectStorage {
    base_path: PathBuf,
    public_url: String,
}

impl LocalObjectStorage {
    pub fn new(base_path: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Storage ids are generated here, so anything with a separator or a
    /// parent reference is rejected outright.
    fn resolve_path(&self, storage_id: &str) -> Option<PathBuf> {
        if storage_id.is_empty()
            || storage_id.contains('/')
            || storage_id.contains('\\')
            || storage_id.contains("..")
        {
            return None;
        }
        Some(self.base_path.join(storage_id))
    }
}

/// Keep the extension so static serving picks a sensible content type
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> ApiResult<StoredObject> {
        let storage_id = match extension_of(file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let file_path = self
            .resolve_path(&storage_id)
            .ok_or_else(|| ApiError::UploadFailed("Invalid storage id".to_string()))?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ApiError::UploadFailed(format!("Failed to create directory: {}", e)))?;

        fs::write(&file_path, data)
            .await
            .map_err(|e| ApiError::UploadFailed(format!("Failed to write file: {}", e)))?;

        tracing::debug!("Stored attachment {} ({} bytes)", storage_id, data.len());

        Ok(StoredObject {
            url: format!("{}/{}", self.public_url, storage_id),
            mime_type: mime_type.to_string(),
            storage_id,
            file_name: file_name.to_string(),
        })
    }

    async fn delete(&self, storage_id: &str) -> bool {
        let Some(file_path) = self.resolve_path(storage_id) else {
            return false;
        };
        match fs::remove_file(&file_path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete attachment {}: {}", storage_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> LocalObjectStorage {
        let dir = std::env::temp_dir().join(format!("ticketdesk-storage-{}", Uuid::new_v4()));
        LocalObjectStorage::new(dir, "/attachments/")
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let storage = temp_storage();
        let stored = storage
            .upload(b"hello", "Notes.TXT", "text/plain")
            .await
            .unwrap();

        assert!(stored.storage_id.ends_with(".txt"));
        assert_eq!(stored.url, format!("/attachments/{}", stored.storage_id));
        assert_eq!(stored.file_name, "Notes.TXT");

        let on_disk = fs::read(storage.base_path().join(&stored.storage_id))
            .await
            .unwrap();
        assert_eq!(on_disk, b"hello");

        assert!(storage.delete(&stored.storage_id).await);
        assert!(!storage.delete(&stored.storage_id).await);
        let _ = fs::remove_dir_all(storage.base_path()).await;
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let storage = temp_storage();
        assert!(!storage.delete("../etc/passwd").await);
        assert!(!storage.delete("").await);
    }

    #[test]
    fn test_extension_sanitized() {
        assert_eq!(extension_of("voice.webm").as_deref(), Some("webm"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("weird.t x t"), None);
    }
}
