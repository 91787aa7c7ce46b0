use crate::config::Config;
use crate::infrastructure::http::controllers as api;
use crate::infrastructure::http::middleware::{optional_auth, require_auth, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};

/// Slack on top of the attachment limit for multipart framing and text fields
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Settings the router needs beyond the application state
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub max_attachment_bytes: usize,
    pub attachment_storage_path: String,
    pub attachment_public_url: String,
    pub cors_origins: Vec<String>,
}

impl From<&Config> for RouterSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_attachment_bytes: config.max_attachment_bytes,
            attachment_storage_path: config.attachment_storage_path.clone(),
            attachment_public_url: config.attachment_public_url.clone(),
            cors_origins: config.cors_origins.clone(),
        }
    }
}

pub fn build_router(state: AppState, settings: &RouterSettings) -> Router {
    // Build protected routes (require authentication)
    let protected = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/session", get(api::auth::get_session))
        .route(
            "/api/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route("/api/users/:id", get(api::users::get_user))
        .route(
            "/api/tickets",
            get(api::tickets::list_tickets).post(api::tickets::create_ticket),
        )
        .route(
            "/api/tickets/assigned",
            get(api::tickets::list_assigned_tickets),
        )
        .route(
            "/api/tickets/created",
            get(api::tickets::list_created_tickets),
        )
        .route(
            "/api/tickets/:ticket_id",
            get(api::tickets::get_ticket).delete(api::tickets::delete_ticket),
        )
        // Lifecycle transitions
        .route(
            "/api/tickets/:ticket_id/accept",
            post(api::tickets::accept_ticket),
        )
        .route(
            "/api/tickets/:ticket_id/unaccept",
            post(api::tickets::unaccept_ticket),
        )
        .route(
            "/api/tickets/:ticket_id/resolve",
            post(api::tickets::resolve_ticket),
        )
        .route(
            "/api/tickets/:ticket_id/reopen",
            post(api::tickets::reopen_ticket),
        )
        .route(
            "/api/tickets/:ticket_id/close",
            post(api::tickets::close_ticket),
        )
        // Chat, audit trail and comments
        .route(
            "/api/tickets/:ticket_id/messages",
            get(api::messages::get_messages).post(api::messages::post_message),
        )
        .route(
            "/api/tickets/:ticket_id/activities",
            get(api::activities::get_activities),
        )
        .route(
            "/api/tickets/:ticket_id/comments",
            get(api::comments::list_comments).post(api::comments::add_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Identity is attached when present; handlers decide whether it is required
    let optionally_authenticated = Router::new()
        .route("/ws", get(api::realtime::ws_handler))
        .route(
            "/api/tickets/:ticket_id/events",
            get(api::realtime::ticket_event_stream),
        )
        .route("/api/stats/mine", get(api::stats::get_my_stats))
        .route(
            "/api/stats/departments",
            get(api::stats::get_department_stats),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(api::auth::login))
        .merge(protected)
        .merge(optionally_authenticated);

    if settings.attachment_public_url.starts_with('/') {
        router = router.nest_service(
            &settings.attachment_public_url,
            ServeDir::new(&settings.attachment_storage_path),
        );
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            settings.max_attachment_bytes + FORM_OVERHEAD_BYTES,
        ))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn health_handler() -> &'static str {
    "OK"
}
