use crate::domain::entities::Ticket;
use crate::domain::ports::notification_dispatcher::{NotificationDispatcher, StatusChangeNotice};
use crate::domain::ports::task_spawner::TaskSpawner;
use crate::domain::ports::user_repository::UserRepository;
use crate::shared::utils::timestamp::now_rfc3339;
use std::sync::Arc;

/// Fire-and-forget status-change notices. Failures are logged and counted,
/// never returned to the transition that triggered them.
#[derive(Clone)]
pub struct NotificationService {
    dispatcher: Arc<dyn NotificationDispatcher>,
    user_repo: Arc<dyn UserRepository>,
    spawner: Arc<dyn TaskSpawner>,
}

impl NotificationService {
    pub fn new(
        dispatcher: Arc<dyn NotificationDispatcher>,
        user_repo: Arc<dyn UserRepository>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            dispatcher,
            user_repo,
            spawner,
        }
    }

    /// Notify the ticket's requester in the background
    pub fn notify_status_change(&self, ticket: &Ticket, remark: &str) {
        let dispatcher = self.dispatcher.clone();
        let user_repo = self.user_repo.clone();
        let ticket_id = ticket.ticket_id.clone();
        let requester_id = ticket.created_by.clone();
        let new_status = ticket.status;
        let remark = remark.to_string();

        self.spawner.spawn(Box::pin(async move {
            let recipient_email = match user_repo.get_user_by_id(&requester_id).await {
                Ok(Some(user)) => user.email,
                Ok(None) => {
                    tracing::warn!(
                        "Skipping notification for ticket {}: requester {} not found",
                        ticket_id,
                        requester_id
                    );
                    metrics::counter!("notifications_failed_total").increment(1);
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping notification for ticket {}: requester lookup failed: {}",
                        ticket_id,
                        e
                    );
                    metrics::counter!("notifications_failed_total").increment(1);
                    return;
                }
            };

            let notice = StatusChangeNotice {
                recipient_email,
                ticket_id,
                new_status,
                remark,
                timestamp: now_rfc3339(),
            };

            if let Err(e) = dispatcher.notify_status_change(&notice).await {
                tracing::warn!(
                    "Failed to notify {} about ticket {}: {}",
                    notice.recipient_email,
                    notice.ticket_id,
                    e
                );
                metrics::counter!("notifications_failed_total").increment(1);
            }
        }));
    }
}
