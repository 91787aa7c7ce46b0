use crate::domain::entities::{AddCommentRequest, CommentView};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(state.comment_service.list_comments(&ticket_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
    Json(request): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let comment = state
        .comment_service
        .add_comment(&ticket_id, &auth_user.user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
