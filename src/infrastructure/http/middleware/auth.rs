use crate::domain::entities::User;
use crate::infrastructure::http::middleware::{ApiError, AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Identity attached to a request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extract and validate the session token from the Authorization header
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user = state.auth_service.validate_session(&token).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user, token });

    Ok(next.run(request).await)
}

/// Attach the identity when a valid token is present, otherwise pass through
/// anonymously. Store errors still fail the request.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = bearer_token(request.headers()).map(str::to_string) {
        match state.auth_service.validate_session(&token).await {
            Ok(user) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedUser { user, token });
            }
            Err(ApiError::Unauthorized) => {
                tracing::debug!("Ignoring invalid bearer token on optional-auth route");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(next.run(request).await)
}
