use crate::domain::entities::{CreateUserRequest, Pagination, User};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let (users, total) = state.user_service.list_users(query.page, query.limit).await?;
    Ok(Json(UserListResponse {
        users,
        pagination: Pagination::new(total, query.page, query.limit.min(100)),
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_user(&id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .user_service
        .create_user(&auth_user.user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}
