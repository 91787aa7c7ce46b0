use crate::application::services::{load_summaries, referenced_ids, summary_or_unknown};
use crate::domain::entities::ActivityView;
use crate::domain::ports::activity_repository::ActivityRepository;
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct ActivityService {
    ticket_repo: Arc<dyn TicketRepository>,
    activity_repo: Arc<dyn ActivityRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl ActivityService {
    pub fn new(
        ticket_repo: Arc<dyn TicketRepository>,
        activity_repo: Arc<dyn ActivityRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            ticket_repo,
            activity_repo,
            user_repo,
        }
    }

    /// Audit trail of a ticket, most recent first
    pub async fn get_activities(&self, ticket_id: &str) -> ApiResult<Vec<ActivityView>> {
        if self.ticket_repo.get_ticket(ticket_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Ticket {} not found", ticket_id)));
        }

        let entries = self.activity_repo.list_progress(ticket_id).await?;
        let ids = referenced_ids(entries.iter().map(|e| &e.user_id));
        let summaries = load_summaries(self.user_repo.as_ref(), ids).await?;

        Ok(entries
            .into_iter()
            .map(|entry| ActivityView {
                user: summary_or_unknown(&summaries, &entry.user_id),
                entry,
            })
            .collect())
    }
}
