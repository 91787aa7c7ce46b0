use crate::domain::entities::{Department, TicketStatus};
use crate::infrastructure::http::middleware::error::ApiResult;

#[async_trait::async_trait]
pub trait StatsRepository: Send + Sync {
    /// Tickets assigned to `user_id` created in `[start, end)`, grouped by status
    async fn count_assigned_by_status(
        &self,
        user_id: &str,
        start: &str,
        end: &str,
    ) -> ApiResult<Vec<(TicketStatus, i64)>>;

    /// Tickets created in `[start, end)` grouped by department and status,
    /// optionally restricted to one department
    async fn count_by_department_and_status(
        &self,
        department: Option<Department>,
        start: &str,
        end: &str,
    ) -> ApiResult<Vec<(Department, TicketStatus, i64)>>;
}
