pub mod auth;
pub mod error;

pub use auth::{optional_auth, require_auth, AuthenticatedUser};
pub use error::{ApiError, ApiResult};

use crate::application::services::{
    ActivityService, AuthService, ChatService, CommentService, StatsService, TicketService,
    UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub ticket_service: TicketService,
    pub chat_service: ChatService,
    pub activity_service: ActivityService,
    pub comment_service: CommentService,
    pub stats_service: StatsService,
}
