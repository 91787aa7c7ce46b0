use crate::domain::entities::ActivityView;
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{Path, State},
    Extension, Json,
};

pub async fn get_activities(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<Vec<ActivityView>>> {
    let activities = state.activity_service.get_activities(&ticket_id).await?;
    Ok(Json(activities))
}
