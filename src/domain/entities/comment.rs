use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::shared::utils::timestamp::now_rfc3339;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub ticket_id: String,
    pub seq: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

impl Comment {
    pub fn new(ticket_id: String, user_id: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            seq: 0,
            user_id,
            content,
            created_at: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: UserSummary,
}
