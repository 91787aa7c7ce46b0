use crate::domain::entities::ChatMessage;
use crate::infrastructure::http::middleware::error::ApiResult;

#[async_trait::async_trait]
pub trait ChatRepository: Send + Sync {
    /// Append to the ticket's transcript; the returned copy carries the store-assigned `seq`
    async fn append_chat_message(&self, message: &ChatMessage) -> ApiResult<ChatMessage>;

    /// Full transcript in append order
    async fn list_chat_messages(&self, ticket_id: &str) -> ApiResult<Vec<ChatMessage>>;

    async fn count_chat_messages(&self, ticket_id: &str) -> ApiResult<i64>;
}
