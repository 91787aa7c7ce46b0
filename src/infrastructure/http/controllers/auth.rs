use crate::domain::entities::{LoginRequest, LoginResponse, User};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{extract::State, http::StatusCode, Extension, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.auth_service.logout(&auth_user.token).await?;
    tracing::info!("User {} logged out", auth_user.user.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_session(Extension(auth_user): Extension<AuthenticatedUser>) -> Json<User> {
    Json(auth_user.user)
}
