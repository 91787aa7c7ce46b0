use crate::domain::entities::StoredObject;
use crate::infrastructure::http::middleware::error::ApiResult;
use async_trait::async_trait;

/// External object store holding chat attachments
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Persist the blob. Any failure is reported as `ApiError::UploadFailed`.
    async fn upload(&self, data: &[u8], file_name: &str, mime_type: &str)
        -> ApiResult<StoredObject>;

    /// Best-effort removal; returns whether the object was deleted
    async fn delete(&self, storage_id: &str) -> bool;
}
