pub mod activity_service;
pub mod auth_service;
pub mod chat_service;
pub mod comment_service;
pub mod notification_service;
pub mod stats_service;
pub mod ticket_service;
pub mod user_service;

pub use activity_service::ActivityService;
pub use auth_service::AuthService;
pub use chat_service::ChatService;
pub use comment_service::CommentService;
pub use notification_service::NotificationService;
pub use stats_service::StatsService;
pub use ticket_service::TicketService;
pub use user_service::UserService;

use crate::domain::entities::UserSummary;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::ApiResult;
use std::collections::HashMap;

/// Sorted, deduplicated owned copy of the user ids a listing references.
/// Built before awaiting so the handler future never holds a borrowing iterator.
pub(crate) fn referenced_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut unique: Vec<String> = ids.into_iter().cloned().collect();
    unique.sort();
    unique.dedup();
    unique
}

/// Resolve display fields for every referenced user id in one query
pub(crate) async fn load_summaries(
    user_repo: &dyn UserRepository,
    ids: Vec<String>,
) -> ApiResult<HashMap<String, UserSummary>> {
    user_repo.get_user_summaries(&ids).await
}

pub(crate) fn summary_or_unknown(
    summaries: &HashMap<String, UserSummary>,
    user_id: &str,
) -> UserSummary {
    summaries
        .get(user_id)
        .cloned()
        .unwrap_or_else(|| UserSummary::unknown(user_id))
}
