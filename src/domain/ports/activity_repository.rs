use crate::domain::entities::ProgressEntry;
use crate::infrastructure::http::middleware::error::ApiResult;

/// Read side of the audit trail. Entries are only written by ticket transitions.
#[async_trait::async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Most recent first (timestamp, then store sequence)
    async fn list_progress(&self, ticket_id: &str) -> ApiResult<Vec<ProgressEntry>>;
}
