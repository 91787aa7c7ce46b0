use crate::application::services::{load_summaries, referenced_ids, summary_or_unknown};
use crate::domain::entities::{AddCommentRequest, Comment, CommentView};
use crate::domain::ports::ticket_repository::TicketRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::http::middleware::error::{ApiError, ApiResult};
use std::sync::Arc;

const MAX_COMMENT_LENGTH: usize = 5_000;

#[derive(Clone)]
pub struct CommentService {
    ticket_repo: Arc<dyn TicketRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(ticket_repo: Arc<dyn TicketRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            ticket_repo,
            user_repo,
        }
    }

    pub async fn add_comment(
        &self,
        ticket_id: &str,
        author_id: &str,
        request: AddCommentRequest,
    ) -> ApiResult<CommentView> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ApiError::BadRequest("Comment content is required".to_string()));
        }
        if content.len() > MAX_COMMENT_LENGTH {
            return Err(ApiError::BadRequest(format!(
                "Comment too long (max {} characters)",
                MAX_COMMENT_LENGTH
            )));
        }

        if self.ticket_repo.get_ticket(ticket_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Ticket {} not found", ticket_id)));
        }
        let author = self
            .user_repo
            .get_user_by_id(author_id)
            .await?
            .ok_or_else(|| ApiError::BadRequest("Author does not match a known user".to_string()))?;

        let comment = Comment::new(ticket_id.to_string(), author.id.clone(), content.to_string());
        let comment = self.ticket_repo.append_comment(&comment).await?;

        tracing::info!("Comment {} added to ticket {}", comment.id, ticket_id);

        Ok(CommentView {
            comment,
            user: author.summary(),
        })
    }

    /// Oldest first
    pub async fn list_comments(&self, ticket_id: &str) -> ApiResult<Vec<CommentView>> {
        if self.ticket_repo.get_ticket(ticket_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Ticket {} not found", ticket_id)));
        }

        let comments = self.ticket_repo.list_comments(ticket_id).await?;
        let ids = referenced_ids(comments.iter().map(|c| &c.user_id));
        let summaries = load_summaries(self.user_repo.as_ref(), ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                user: summary_or_unknown(&summaries, &comment.user_id),
                comment,
            })
            .collect())
    }
}
