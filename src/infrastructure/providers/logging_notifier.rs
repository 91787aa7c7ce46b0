use crate::domain::ports::notification_dispatcher::{NotificationDispatcher, StatusChangeNotice};
use async_trait::async_trait;

/// Used when no SMTP relay is configured; notices only reach the log
#[derive(Clone, Default)]
pub struct LoggingNotificationDispatcher;

impl LoggingNotificationDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationDispatcher for LoggingNotificationDispatcher {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> Result<(), String> {
        tracing::info!(
            recipient = %notice.recipient_email,
            ticket_id = %notice.ticket_id,
            status = %notice.new_status,
            "Status change notice (SMTP not configured): {}",
            notice.remark
        );
        Ok(())
    }
}
