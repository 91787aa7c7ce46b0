use crate::domain::entities::{Comment, ProgressEntry, Ticket, TicketFilter};
use crate::domain::services::state_machine::TicketState;
use crate::infrastructure::http::middleware::error::ApiResult;

#[async_trait::async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert the ticket together with its first audit entry
    async fn create_ticket(&self, ticket: &Ticket, created: &ProgressEntry) -> ApiResult<()>;

    async fn get_ticket(&self, ticket_id: &str) -> ApiResult<Option<Ticket>>;

    /// Write the lifecycle fields and append the audit entry in one transaction.
    /// Returns `None` when the ticket no longer exists.
    async fn apply_transition(
        &self,
        ticket_id: &str,
        next: &TicketState,
        entry: &ProgressEntry,
    ) -> ApiResult<Option<Ticket>>;

    async fn list_tickets(
        &self,
        filter: &TicketFilter,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Ticket>, i64)>;

    /// Administrative hard delete, embedded collections included
    async fn delete_ticket(&self, ticket_id: &str) -> ApiResult<bool>;

    async fn append_comment(&self, comment: &Comment) -> ApiResult<Comment>;

    async fn list_comments(&self, ticket_id: &str) -> ApiResult<Vec<Comment>>;
}
