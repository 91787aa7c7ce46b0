use crate::domain::entities::{CreateTicketRequest, TicketFilter, TicketPage, TicketView};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<Json<TicketPage>> {
    Ok(Json(state.ticket_service.list_tickets(filter).await?))
}

pub async fn list_assigned_tickets(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<Json<TicketPage>> {
    let page = state
        .ticket_service
        .list_assigned(&auth_user.user.id, filter)
        .await?;
    Ok(Json(page))
}

pub async fn list_created_tickets(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(filter): Query<TicketFilter>,
) -> ApiResult<Json<TicketPage>> {
    let page = state
        .ticket_service
        .list_created(&auth_user.user.id, filter)
        .await?;
    Ok(Json(page))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<TicketView>)> {
    let ticket = state
        .ticket_service
        .create_ticket(&auth_user.user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    Ok(Json(state.ticket_service.get_ticket(&ticket_id).await?))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .ticket_service
        .delete_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn accept_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    let ticket = state
        .ticket_service
        .accept_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(Json(ticket))
}

pub async fn unaccept_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    let ticket = state
        .ticket_service
        .unaccept_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(Json(ticket))
}

pub async fn resolve_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    let ticket = state
        .ticket_service
        .resolve_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(Json(ticket))
}

pub async fn reopen_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    let ticket = state
        .ticket_service
        .reopen_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(Json(ticket))
}

pub async fn close_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<TicketView>> {
    let ticket = state
        .ticket_service
        .close_ticket(&ticket_id, &auth_user.user.id)
        .await?;
    Ok(Json(ticket))
}
