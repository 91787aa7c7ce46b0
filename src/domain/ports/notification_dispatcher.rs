use crate::domain::entities::TicketStatus;
use async_trait::async_trait;

/// Status-change notice sent to a ticket's requester
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChangeNotice {
    pub recipient_email: String,
    pub ticket_id: String,
    pub new_status: TicketStatus,
    pub remark: String,
    pub timestamp: String,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> Result<(), String>;
}
