use crate::domain::entities::{User, UserSummary};
use crate::infrastructure::http::middleware::error::ApiResult;
use std::collections::HashMap;

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> ApiResult<()>;

    async fn get_user_by_id(&self, id: &str) -> ApiResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    async fn list_users(&self, limit: i64, offset: i64) -> ApiResult<(Vec<User>, i64)>;

    /// Display fields for a batch of ids; unknown ids are absent from the map
    async fn get_user_summaries(&self, ids: &[String]) -> ApiResult<HashMap<String, UserSummary>>;
}
