use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::TicketStatus;
use super::user::UserSummary;
use crate::shared::utils::timestamp::now_rfc3339;

/// One audit event on a ticket. Written only as a side effect of a transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    pub ticket_id: String,
    pub seq: i64,
    pub user_id: String,
    pub description: String,
    /// Ticket status right after the event
    pub status: TicketStatus,
    pub created_at: String,
}

impl ProgressEntry {
    pub fn new(
        ticket_id: String,
        user_id: String,
        description: impl Into<String>,
        status: TicketStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            seq: 0,
            user_id,
            description: description.into(),
            status,
            created_at: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    #[serde(flatten)]
    pub entry: ProgressEntry,
    pub user: UserSummary,
}
