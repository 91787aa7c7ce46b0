use crate::domain::entities::{DepartmentStats, MyStats, StatsQuery};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{Query, State},
    Extension, Json,
};

// Mounted behind optional_auth; the stats service rejects anonymous callers.
pub async fn get_my_stats(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<MyStats>> {
    let actor_id = auth_user.as_ref().map(|Extension(u)| u.user.id.as_str());
    Ok(Json(state.stats_service.get_my_stats(actor_id, query).await?))
}

pub async fn get_department_stats(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<DepartmentStats>> {
    let actor_id = auth_user.as_ref().map(|Extension(u)| u.user.id.as_str());
    let stats = state
        .stats_service
        .get_department_stats(actor_id, query)
        .await?;
    Ok(Json(stats))
}
